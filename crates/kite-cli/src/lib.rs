use clap::ValueEnum;
use std::fmt;

pub mod commands;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pretty => "pretty",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Auth method CLI flag, mapped onto the core variants.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum AuthMethodArg {
    Memberstack,
    Cookie,
    LocalStorage,
    Bearer,
    Custom,
}

impl fmt::Display for AuthMethodArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthMethodArg::Memberstack => "memberstack",
            AuthMethodArg::Cookie => "cookie",
            AuthMethodArg::LocalStorage => "local-storage",
            AuthMethodArg::Bearer => "bearer",
            AuthMethodArg::Custom => "custom",
        };
        f.write_str(name)
    }
}

impl From<AuthMethodArg> for kite_core::model::AuthMethod {
    fn from(arg: AuthMethodArg) -> Self {
        match arg {
            AuthMethodArg::Memberstack => kite_core::model::AuthMethod::Memberstack,
            AuthMethodArg::Cookie => kite_core::model::AuthMethod::Cookie,
            AuthMethodArg::LocalStorage => kite_core::model::AuthMethod::LocalStorage,
            AuthMethodArg::Bearer => kite_core::model::AuthMethod::Bearer,
            AuthMethodArg::Custom => kite_core::model::AuthMethod::Custom,
        }
    }
}

/// Test scope CLI flag.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ScopeArg {
    FullPage,
    ApiOnly,
    AssetsOnly,
}

impl fmt::Display for ScopeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScopeArg::FullPage => "full-page",
            ScopeArg::ApiOnly => "api-only",
            ScopeArg::AssetsOnly => "assets-only",
        };
        f.write_str(name)
    }
}

impl From<ScopeArg> for kite_core::model::TestScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::FullPage => kite_core::model::TestScope::FullPage,
            ScopeArg::ApiOnly => kite_core::model::TestScope::ApiOnly,
            ScopeArg::AssetsOnly => kite_core::model::TestScope::AssetsOnly,
        }
    }
}
