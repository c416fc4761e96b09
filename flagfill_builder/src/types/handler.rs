use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use regex::Regex;

use crate::api::{
    format_duration, parse_duration, parse_string_map, split_values, FillError, FlagRegistry,
    InvalidValue, Optional, Primitive, Scalar, StringList, StringMap, Value,
};
use crate::constant::*;
use crate::model::Tags;

pub(crate) type ConvertFn<T> = Arc<dyn Fn(&str, &Tags) -> Result<T, String> + Send + Sync>;

/// Everything the walker resolved about a single flag before binding it to a field.
pub(crate) struct Registration<'t> {
    pub(crate) name: String,
    pub(crate) usage: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) tags: &'t Tags,
    pub(crate) splitter: Option<&'t Regex>,
}

impl Registration<'_> {
    pub(crate) fn default_text(&self) -> Option<&str> {
        self.tags.get(TAG_DEFAULT)
    }

    /// Register `value` under the flag name and each alias; all registrations share its storage.
    pub(crate) fn register<'a, V>(
        &self,
        registry: &mut dyn FlagRegistry<'a>,
        value: V,
    ) -> Result<(), FillError>
    where
        V: Value + Clone + 'a,
    {
        registry.register(&self.name, &self.usage, Box::new(value.clone()))?;

        for alias in &self.aliases {
            registry.register(alias, &self.usage, Box::new(value.clone()))?;
        }

        Ok(())
    }
}

/// Binds a field of one specific type to flags.
pub(crate) trait Handler: Send + Sync {
    /// Apply the default, then register the field's flags.
    /// Returns `false` when `target` is not of the handled type.
    fn bind<'a>(
        &self,
        target: &'a mut dyn Any,
        registry: &mut dyn FlagRegistry<'a>,
        registration: &Registration<'_>,
    ) -> Result<bool, FillError>;

    /// Like [`Handler::bind`], for an `Option` of the handled type.
    /// The default applies as `Some`; without one the field stays `None` until set.
    fn bind_optional<'a>(
        &self,
        target: &'a mut dyn Any,
        registry: &mut dyn FlagRegistry<'a>,
        registration: &Registration<'_>,
    ) -> Result<bool, FillError> {
        let _ = (target, registry, registration);
        Ok(false)
    }
}

/// A scalar handler built from a text converter.
pub(crate) struct Converted<T> {
    convert: ConvertFn<T>,
    render: fn(&T) -> String,
    kind: &'static str,
    placeholder: &'static str,
    bool_flag: bool,
}

impl<T: 'static> Converted<T> {
    pub(crate) fn new(
        convert: ConvertFn<T>,
        render: fn(&T) -> String,
        kind: &'static str,
        placeholder: &'static str,
    ) -> Self {
        Self {
            convert,
            render,
            kind,
            placeholder,
            bool_flag: false,
        }
    }

    pub(crate) fn primitive() -> Self
    where
        T: Primitive,
    {
        Self {
            convert: Arc::new(|text: &str, _: &Tags| T::parse_text(text)),
            render: T::render_text,
            kind: T::KIND,
            placeholder: T::PLACEHOLDER,
            bool_flag: T::IS_BOOL,
        }
    }

    pub(crate) fn via<P>() -> Self
    where
        T: From<P> + Display,
        P: Primitive,
    {
        Self {
            convert: Arc::new(|text: &str, _: &Tags| P::parse_text(text).map(T::from)),
            render: render_display::<T>,
            kind: std::any::type_name::<T>(),
            placeholder: P::PLACEHOLDER,
            bool_flag: P::IS_BOOL,
        }
    }
}

pub(crate) fn render_display<T: Display>(value: &T) -> String {
    value.to_string()
}

impl<T: 'static> Handler for Converted<T> {
    fn bind<'a>(
        &self,
        target: &'a mut dyn Any,
        registry: &mut dyn FlagRegistry<'a>,
        registration: &Registration<'_>,
    ) -> Result<bool, FillError> {
        let Some(target) = target.downcast_mut::<T>() else {
            return Ok(false);
        };

        if let Some(default) = registration.default_text() {
            *target = self.convert_default(default, registration)?;
        }

        let convert = self.convert.clone();
        let tags = registration.tags.clone();
        let value = Scalar::converted(
            target,
            move |text| convert(text, &tags),
            self.render,
            self.placeholder,
        )
        .bool_flag(self.bool_flag);
        registration.register(registry, value)?;
        Ok(true)
    }

    fn bind_optional<'a>(
        &self,
        target: &'a mut dyn Any,
        registry: &mut dyn FlagRegistry<'a>,
        registration: &Registration<'_>,
    ) -> Result<bool, FillError> {
        let Some(target) = target.downcast_mut::<Option<T>>() else {
            return Ok(false);
        };

        if let Some(default) = registration.default_text() {
            *target = Some(self.convert_default(default, registration)?);
        }

        let convert = self.convert.clone();
        let tags = registration.tags.clone();
        let value = Optional::converted(
            target,
            move |text| convert(text, &tags),
            self.render,
            self.placeholder,
        )
        .bool_flag(self.bool_flag);
        registration.register(registry, value)?;
        Ok(true)
    }
}

impl<T> Converted<T> {
    fn convert_default(
        &self,
        default: &str,
        registration: &Registration<'_>,
    ) -> Result<T, FillError> {
        (self.convert)(default, registration.tags).map_err(|message| FillError::Default {
            type_name: self.kind,
            source: InvalidValue::new(default, self.placeholder, message),
        })
    }
}

/// Handles `Vec<String>` fields.
pub(crate) struct ListHandler;

impl Handler for ListHandler {
    fn bind<'a>(
        &self,
        target: &'a mut dyn Any,
        registry: &mut dyn FlagRegistry<'a>,
        registration: &Registration<'_>,
    ) -> Result<bool, FillError> {
        let Some(target) = target.downcast_mut::<Vec<String>>() else {
            return Ok(false);
        };

        if let Some(default) = registration.default_text() {
            *target = split_values(default, registration.splitter);
        }

        let value = StringList::new(
            target,
            registration.tags.is_true(TAG_OVERRIDE_VALUE),
            registration.splitter.cloned(),
        );
        registration.register(registry, value)?;
        Ok(true)
    }
}

/// Handles `HashMap<String, String>` fields.
pub(crate) struct MapHandler;

impl Handler for MapHandler {
    fn bind<'a>(
        &self,
        target: &'a mut dyn Any,
        registry: &mut dyn FlagRegistry<'a>,
        registration: &Registration<'_>,
    ) -> Result<bool, FillError> {
        let Some(target) = target.downcast_mut::<HashMap<String, String>>() else {
            return Ok(false);
        };

        if let Some(default) = registration.default_text() {
            *target = parse_string_map(default);
        }

        registration.register(registry, StringMap::new(target))?;
        Ok(true)
    }
}

// Signed nanoseconds accept a leading `-`, unlike `Duration`.
fn nanos_i64(text: &str, _: &Tags) -> Result<i64, String> {
    let (negative, magnitude) = match text.strip_prefix('-') {
        Some(magnitude) => (true, magnitude),
        None => (false, text),
    };
    let nanos = i128::try_from(parse_duration(magnitude)?.as_nanos())
        .map_err(|error| error.to_string())?;
    let nanos = if negative { -nanos } else { nanos };
    i64::try_from(nanos).map_err(|_| format!("duration '{text}' is out of range"))
}

fn render_nanos_i64(nanos: &i64) -> String {
    let magnitude = format_duration(Duration::from_nanos(nanos.unsigned_abs()));

    if *nanos < 0 {
        format!("-{magnitude}")
    } else {
        magnitude
    }
}

fn nanos_u64(text: &str, _: &Tags) -> Result<u64, String> {
    let duration = parse_duration(text)?;
    u64::try_from(duration.as_nanos()).map_err(|error| error.to_string())
}

fn render_nanos_u64(nanos: &u64) -> String {
    format_duration(Duration::from_nanos(*nanos))
}

struct Builtins {
    kinds: HashMap<TypeId, Arc<dyn Handler>>,
    nanos: HashMap<TypeId, Arc<dyn Handler>>,
}

fn builtins() -> &'static Builtins {
    static BUILTINS: OnceLock<Builtins> = OnceLock::new();
    BUILTINS.get_or_init(|| {
        let mut kinds: HashMap<TypeId, Arc<dyn Handler>> = HashMap::default();
        kinds.insert(
            TypeId::of::<String>(),
            Arc::new(Converted::<String>::primitive()),
        );
        kinds.insert(TypeId::of::<bool>(), Arc::new(Converted::<bool>::primitive()));
        kinds.insert(TypeId::of::<f64>(), Arc::new(Converted::<f64>::primitive()));
        kinds.insert(
            TypeId::of::<Duration>(),
            Arc::new(Converted::<Duration>::primitive()),
        );
        kinds.insert(TypeId::of::<i64>(), Arc::new(Converted::<i64>::primitive()));
        kinds.insert(TypeId::of::<i32>(), Arc::new(Converted::<i32>::primitive()));
        kinds.insert(
            TypeId::of::<isize>(),
            Arc::new(Converted::<isize>::primitive()),
        );
        kinds.insert(TypeId::of::<u64>(), Arc::new(Converted::<u64>::primitive()));
        kinds.insert(TypeId::of::<u32>(), Arc::new(Converted::<u32>::primitive()));
        kinds.insert(
            TypeId::of::<usize>(),
            Arc::new(Converted::<usize>::primitive()),
        );
        kinds.insert(TypeId::of::<Vec<String>>(), Arc::new(ListHandler));
        kinds.insert(TypeId::of::<HashMap<String, String>>(), Arc::new(MapHandler));

        let mut nanos: HashMap<TypeId, Arc<dyn Handler>> = HashMap::default();
        nanos.insert(
            TypeId::of::<i64>(),
            Arc::new(Converted::<i64>::new(
                Arc::new(nanos_i64),
                render_nanos_i64,
                "duration",
                "duration",
            )),
        );
        nanos.insert(
            TypeId::of::<u64>(),
            Arc::new(Converted::<u64>::new(
                Arc::new(nanos_u64),
                render_nanos_u64,
                "duration",
                "duration",
            )),
        );

        Builtins { kinds, nanos }
    })
}

/// The handler of a built-in kind for the type, if any.
pub(crate) fn builtin(type_id: TypeId) -> Option<Arc<dyn Handler>> {
    builtins().kinds.get(&type_id).cloned()
}

/// The handler selected by an explicit `type` hint, when the type can store the hinted kind.
/// Integer fields hinted as `duration` hold nanoseconds.
pub(crate) fn hinted(hint: &str, type_id: TypeId) -> Option<Arc<dyn Handler>> {
    match hint {
        HINT_DURATION if type_id == TypeId::of::<Duration>() => builtin(type_id),
        HINT_DURATION => builtins().nanos.get(&type_id).cloned(),
        HINT_STRING_SLICE if type_id == TypeId::of::<Vec<String>>() => builtin(type_id),
        HINT_STRING_MAP if type_id == TypeId::of::<HashMap<String, String>>() => {
            builtin(type_id)
        }
        _ => None,
    }
}
