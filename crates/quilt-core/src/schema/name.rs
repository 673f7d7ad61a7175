use heck::ToSnakeCase;

/// A model name, as registered.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Name(String);

impl Name {
    pub fn new(src: impl Into<String>) -> Self {
        Self(src.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn snake_case(&self) -> String {
        self.0.to_snake_case()
    }

    /// The default table name: the pluralised snake case name.
    pub fn table_name(&self) -> String {
        pluralizer::pluralize(&self.snake_case(), 2, false)
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
