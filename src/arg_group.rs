// Licensed under the MIT license or the Apache License, Version 2.0, at your option. You may not
// copy, modify, or distribute this file except in compliance with said license.

//! Named sets of arg ids with group-level required/exclusive semantics.

/// A named set of arg ids.
///
/// If `multiple` is `false` (the default), the arguments within the group are mutually exclusive:
/// at most one may be present at once. If `required` is `true`, at least one must be present.
#[derive(Debug, Clone)]
pub struct ArgGroup {
    pub(crate) id: String,
    pub(crate) args: Vec<String>,
    pub(crate) required: bool,
    pub(crate) multiple: bool,
    pub(crate) conflicts_with: Vec<String>,
    pub(crate) requires: Vec<String>,
}

impl ArgGroup {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            args: Vec::new(),
            required: false,
            multiple: false,
            conflicts_with: Vec::new(),
            requires: Vec::new(),
        }
    }

    pub fn arg(mut self, id: impl Into<String>) -> Self {
        self.args.push(id.into());
        self
    }

    pub fn args<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn required(mut self, yes: bool) -> Self {
        self.required = yes;
        self
    }

    pub fn multiple(mut self, yes: bool) -> Self {
        self.multiple = yes;
        self
    }

    pub fn conflicts_with(mut self, id: impl Into<String>) -> Self {
        self.conflicts_with.push(id.into());
        self
    }

    pub fn requires(mut self, id: impl Into<String>) -> Self {
        self.requires.push(id.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn args_ids(&self) -> &[String] {
        &self.args
    }

    /// Is membership in this group mutually exclusive (i.e. `multiple == false`)?
    pub fn is_exclusive(&self) -> bool {
        !self.multiple
    }
}
