use std::any::{type_name, Any, TypeId};
use std::sync::Arc;

use regex::Regex;
use tracing::{debug, trace};

use crate::api::{FillError, FlagRegistry, TextValue, Visit};
use crate::constant::*;
use crate::model::Field;
use crate::options::Options;
use crate::types::{builtin, hinted, Handler, Registration, TypeRegistry};

/// Walks the fields of a struct, registering one flag per terminal field.
///
/// The code generated by `#[derive(Fill)]` calls into the walker once per visible field:
/// [`Walker::terminal`] for fields of built-in kinds, [`Walker::pointer`] for optional groups, and
/// [`Visit::visit`] for everything else.
pub struct Walker<'a, 'r> {
    registry: &'r mut dyn FlagRegistry<'a>,
    options: &'r Options,
    types: &'r TypeRegistry,
    splitter: Option<&'r Regex>,
    prefix: String,
    container: &'static str,
}

impl<'a, 'r> Walker<'a, 'r> {
    pub(crate) fn new(
        registry: &'r mut dyn FlagRegistry<'a>,
        options: &'r Options,
        types: &'r TypeRegistry,
        splitter: Option<&'r Regex>,
        container: &'static str,
    ) -> Self {
        Self {
            registry,
            options,
            types,
            splitter,
            prefix: String::default(),
            container,
        }
    }

    /// Walk into the fields of a nested struct.
    ///
    /// Registered types are not walked into; they become a single flag.
    /// The field's name extends the structural path, unless the field is flattened.
    pub fn group<T: Visit>(&mut self, field: &Field, target: &'a mut T) -> Result<(), FillError> {
        if field.is_skipped() {
            return Ok(());
        }

        if self.types.contains_id(TypeId::of::<T>()) {
            return self.terminal(field, target);
        }

        let prefix = if field.is_flattened() {
            self.prefix.clone()
        } else {
            self.path(field.name())
        };
        let outer_prefix = std::mem::replace(&mut self.prefix, prefix);
        let outer_container = std::mem::replace(&mut self.container, type_name::<T>());
        let result = target.walk(self);
        self.prefix = outer_prefix;
        self.container = outer_container;
        result.map_err(|source| self.wrap(field, source))
    }

    /// Visit an optional field, filling an absent value with its default first.
    pub fn pointer<T: Visit + Default>(
        &mut self,
        field: &Field,
        target: &'a mut Option<T>,
    ) -> Result<(), FillError> {
        if field.is_skipped() {
            return Ok(());
        }

        if self.types.contains_id(TypeId::of::<T>()) {
            return self.optional(field, target);
        }

        target.get_or_insert_with(T::default).visit(self, field)
    }

    /// Register a flag for an optional field of a registered type.
    /// The field stays `None` unless a default, the environment or an argument sets it.
    pub fn optional<T: Any>(
        &mut self,
        field: &Field,
        target: &'a mut Option<T>,
    ) -> Result<(), FillError> {
        self.process(field, Slot::Optional(target))
            .map_err(|source| self.wrap(field, source))
    }

    /// Register a flag for a [`TextValue`] field, registering its type on first use.
    pub fn text<T: TextValue>(&mut self, field: &Field, target: &'a mut T) -> Result<(), FillError> {
        if self.types.register_text::<T>() {
            trace!(type_name = type_name::<T>(), "registered text value type");
        }

        self.terminal(field, target)
    }

    /// Register the flags of a single field, dispatched on its type.
    /// Fields of unsupported types are ignored.
    pub fn terminal<T: Any>(&mut self, field: &Field, target: &'a mut T) -> Result<(), FillError> {
        self.process(field, Slot::Required(target))
            .map_err(|source| self.wrap(field, source))
    }

    fn process<T: Any>(&mut self, field: &Field, target: Slot<'a, T>) -> Result<(), FillError> {
        if field.is_skipped() {
            trace!(field = field.name(), "skipping field");
            return Ok(());
        }

        let tags = field.tags();
        let path = self.path(field.name());
        let env = match tags.get(TAG_ENV) {
            Some(env) => Some(env.to_string()),
            None => self.options.env_name(&path),
        }
        .filter(|env| !env.is_empty());
        let mut usage = requote_usage(tags.get(TAG_USAGE).unwrap_or_default());

        if let Some(env) = &env {
            usage = format!("{usage} (env {env})");
        }

        let name = match tags.get(TAG_FLAG) {
            Some(name) => name.to_string(),
            None => self.options.flag_name(&path),
        };

        let Some(handler) = self.resolve::<T>(tags.get(TAG_TYPE)) else {
            trace!(
                field = %path,
                type_name = type_name::<T>(),
                "ignoring field of unsupported type"
            );
            return Ok(());
        };

        let registration = Registration {
            name,
            usage,
            aliases: parse_aliases(tags.get(TAG_ALIASES)),
            tags,
            splitter: self.splitter,
        };

        let bound = match target {
            Slot::Required(target) => handler.bind(target, &mut *self.registry, &registration)?,
            Slot::Optional(target) => {
                handler.bind_optional(target, &mut *self.registry, &registration)?
            }
        };

        if !bound {
            trace!(
                field = %path,
                type_name = type_name::<T>(),
                "ignoring field of unsupported type"
            );
            return Ok(());
        }

        debug!(
            flag = %registration.name,
            aliases = ?registration.aliases,
            env = ?env,
            "registered flag"
        );

        match env {
            Some(env) if self.options.set_from_env() => self.apply_env(&registration.name, &env),
            _ => Ok(()),
        }
    }

    fn resolve<T: Any>(&self, hint: Option<&str>) -> Option<Arc<dyn Handler>> {
        let type_id = TypeId::of::<T>();
        hint.and_then(|hint| hinted(hint, type_id))
            .or_else(|| self.types.handler(type_id))
            .or_else(|| builtin(type_id))
    }

    fn apply_env(&mut self, name: &str, env: &str) -> Result<(), FillError> {
        if let Some(value) = std::env::var_os(env) {
            let value = value.to_string_lossy();
            debug!(flag = name, env, "setting flag from environment");
            self.registry
                .set(name, &value)
                .map_err(|source| FillError::Env {
                    env: env.to_string(),
                    source,
                })?;
        }

        Ok(())
    }

    fn path(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}{PATH_SEPARATOR}{name}", self.prefix)
        }
    }

    fn wrap(&self, field: &Field, source: FillError) -> FillError {
        FillError::Field {
            field: field.name().to_string(),
            container: self.container,
            source: Box::new(source),
        }
    }
}

enum Slot<'a, T> {
    Required(&'a mut T),
    Optional(&'a mut Option<T>),
}

/// Rewrite `[placeholder]` spans into the back-quoted form understood by the flag set.
fn requote_usage(usage: &str) -> String {
    usage
        .chars()
        .map(|c| match c {
            '[' | ']' => '`',
            _ => c,
        })
        .collect()
}

fn parse_aliases(aliases: Option<&str>) -> Vec<String> {
    aliases
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|alias| !alias.is_empty())
        .map(str::to_string)
        .collect()
}
