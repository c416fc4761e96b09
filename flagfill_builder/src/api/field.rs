use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use regex::Regex;

use crate::api::capture::*;
use crate::api::convert::Primitive;

type Converter<'a, T> = Rc<dyn Fn(&str) -> Result<T, String> + 'a>;

/// A flag value that stores a single converted value into a field.
///
/// Clones share the same field, so that each alias of a flag writes through to the same storage.
pub struct Scalar<'a, T> {
    variable: Rc<RefCell<&'a mut T>>,
    convert: Converter<'a, T>,
    render: fn(&T) -> String,
    type_name: &'static str,
    bool_flag: bool,
}

impl<'a, T> Clone for Scalar<'a, T> {
    fn clone(&self) -> Self {
        Self {
            variable: self.variable.clone(),
            convert: self.convert.clone(),
            render: self.render,
            type_name: self.type_name,
            bool_flag: self.bool_flag,
        }
    }
}

impl<'a, T: Primitive> Scalar<'a, T> {
    /// Create a scalar flag value for a built-in kind.
    pub fn new(variable: &'a mut T) -> Self {
        Self::converted(
            variable,
            T::parse_text,
            T::render_text,
            T::PLACEHOLDER,
        )
        .bool_flag(T::IS_BOOL)
    }
}

impl<'a, T> Scalar<'a, T> {
    /// Create a scalar flag value with an explicit converter.
    pub fn converted(
        variable: &'a mut T,
        convert: impl Fn(&str) -> Result<T, String> + 'a,
        render: fn(&T) -> String,
        type_name: &'static str,
    ) -> Self {
        Self {
            variable: Rc::new(RefCell::new(variable)),
            convert: Rc::new(convert),
            render,
            type_name,
            bool_flag: false,
        }
    }

    pub(crate) fn bool_flag(mut self, bool_flag: bool) -> Self {
        self.bool_flag = bool_flag;
        self
    }
}

impl<'a, T> Value for Scalar<'a, T> {
    fn set(&mut self, text: &str) -> Result<(), InvalidValue> {
        let value = (self.convert)(text)
            .map_err(|message| InvalidValue::new(text, self.type_name, message))?;
        **self.variable.borrow_mut() = value;
        Ok(())
    }

    fn render(&self) -> String {
        (self.render)(&**self.variable.borrow())
    }

    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn is_bool_flag(&self) -> bool {
        self.bool_flag
    }
}

/// A flag value that stores a single converted value into an optional field.
///
/// The field stays `None` until the flag is set; an unset field renders as the empty string.
pub struct Optional<'a, T> {
    variable: Rc<RefCell<&'a mut Option<T>>>,
    convert: Converter<'a, T>,
    render: fn(&T) -> String,
    type_name: &'static str,
    bool_flag: bool,
}

impl<'a, T> Clone for Optional<'a, T> {
    fn clone(&self) -> Self {
        Self {
            variable: self.variable.clone(),
            convert: self.convert.clone(),
            render: self.render,
            type_name: self.type_name,
            bool_flag: self.bool_flag,
        }
    }
}

impl<'a, T> Optional<'a, T> {
    /// Create an optional flag value with an explicit converter.
    pub fn converted(
        variable: &'a mut Option<T>,
        convert: impl Fn(&str) -> Result<T, String> + 'a,
        render: fn(&T) -> String,
        type_name: &'static str,
    ) -> Self {
        Self {
            variable: Rc::new(RefCell::new(variable)),
            convert: Rc::new(convert),
            render,
            type_name,
            bool_flag: false,
        }
    }

    pub(crate) fn bool_flag(mut self, bool_flag: bool) -> Self {
        self.bool_flag = bool_flag;
        self
    }
}

impl<'a, T> Value for Optional<'a, T> {
    fn set(&mut self, text: &str) -> Result<(), InvalidValue> {
        let value = (self.convert)(text)
            .map_err(|message| InvalidValue::new(text, self.type_name, message))?;
        **self.variable.borrow_mut() = Some(value);
        Ok(())
    }

    fn render(&self) -> String {
        match &**self.variable.borrow() {
            Some(value) => (self.render)(value),
            None => String::default(),
        }
    }

    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn is_bool_flag(&self) -> bool {
        self.bool_flag
    }
}

/// A repeatable flag value backed by a `Vec<String>`.
///
/// Each set splits its text with the configured pattern, trims the pieces and drops blank ones.
/// The pieces are appended, unless the list overrides, in which case they replace the contents.
pub struct StringList<'a> {
    variable: Rc<RefCell<&'a mut Vec<String>>>,
    override_value: bool,
    splitter: Option<Regex>,
}

impl<'a> Clone for StringList<'a> {
    fn clone(&self) -> Self {
        Self {
            variable: self.variable.clone(),
            override_value: self.override_value,
            splitter: self.splitter.clone(),
        }
    }
}

impl<'a> StringList<'a> {
    /// Create a list flag value.
    /// Without a splitter, each set contributes its text as a single element.
    pub fn new(variable: &'a mut Vec<String>, override_value: bool, splitter: Option<Regex>) -> Self {
        Self {
            variable: Rc::new(RefCell::new(variable)),
            override_value,
            splitter,
        }
    }
}

impl<'a> Value for StringList<'a> {
    fn set(&mut self, text: &str) -> Result<(), InvalidValue> {
        let parts = split_values(text, self.splitter.as_ref());
        let mut variable = self.variable.borrow_mut();

        if self.override_value {
            **variable = parts;
        } else {
            variable.extend(parts);
        }

        Ok(())
    }

    fn render(&self) -> String {
        self.variable.borrow().join(",")
    }

    fn type_name(&self) -> &'static str {
        "value"
    }
}

/// A repeatable flag value backed by a `HashMap<String, String>`.
///
/// Each set parses `key=value` pairs separated by commas or newlines and merges them in.
pub struct StringMap<'a> {
    variable: Rc<RefCell<&'a mut HashMap<String, String>>>,
}

impl<'a> Clone for StringMap<'a> {
    fn clone(&self) -> Self {
        Self {
            variable: self.variable.clone(),
        }
    }
}

impl<'a> StringMap<'a> {
    /// Create a map flag value.
    pub fn new(variable: &'a mut HashMap<String, String>) -> Self {
        Self {
            variable: Rc::new(RefCell::new(variable)),
        }
    }
}

impl<'a> Value for StringMap<'a> {
    fn set(&mut self, text: &str) -> Result<(), InvalidValue> {
        self.variable.borrow_mut().extend(parse_string_map(text));
        Ok(())
    }

    fn render(&self) -> String {
        let variable = self.variable.borrow();
        let mut entries: Vec<(&String, &String)> = variable.iter().collect();
        entries.sort();
        entries
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn type_name(&self) -> &'static str {
        "value"
    }
}

/// Split list text into its elements.
pub(crate) fn split_values(text: &str, splitter: Option<&Regex>) -> Vec<String> {
    match splitter {
        None => vec![text.to_string()],
        Some(splitter) => splitter
            .split(text)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

/// Parse `key=value` pairs separated by commas or newlines.
/// A pair without `=` maps its key to the empty string.
pub(crate) fn parse_string_map(text: &str) -> HashMap<String, String> {
    text.split(|c| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (pair.to_string(), String::default()),
        })
        .collect()
}
