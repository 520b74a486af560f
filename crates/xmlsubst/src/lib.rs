//! # xmlsubst - environment substitution for xml configuration files
//!
//! Rewrites the settings of .NET style `app.config`/`web.config` files with values taken
//! from environment variables.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `xmlsubst` works internally.
//!
//! ### Configuration files
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <configuration>
//!   <appSettings>
//!     <add key="ApiUrl" value="http://localhost:8080" />
//!   </appSettings>
//!   <connectionStrings>
//!     <add name="Main" connectionString="Server=.;Database=dev" />
//!   </connectionStrings>
//! </configuration>
//! ```
//!
//! In xmlsubst terms...
//! - the children of `<configuration>` are `sections`
//! - an `<add>` element directly inside a section is an `add node`
//! - an add node is selected by its `key` attribute (which updates `value`)
//! - ...and independently by its `name` attribute (which updates `connectionString`)
//!
//! Only `appSettings` is substituted unless more sections are enabled.
//!
//! ### Resolving files
//!
//! see [resolver::resolve]
//!
//! Glob patterns are expanded in order into a deduplicated list of files. Patterns that
//! do not match anything are reported, but only a run that finds no files at all fails.
//!
//! ### Environment
//!
//! see [environment::EnvironmentMap]
//!
//! The process environment is captured once per run. Variable names are compared
//! ignoring case: with `APIURL=http://prod` in the environment the node
//! `<add key="ApiUrl" .../>` is updated.
//!
//! ### Substitution
//!
//! see [substitute::substitute]
//!
//! | **node**                                 | **environment** | **result**                 |
//! |------------------------------------------|-----------------|----------------------------|
//! | `<add key="ApiUrl" value="a" />`         | `APIURL=b`      | `value="b"`                |
//! | `<add key="ApiUrl" value="b" />`         | `APIURL=b`      | unchanged                  |
//! | `<add key="ApiUrl" />`                   | `APIURL=b`      | `value="b"` is appended    |
//! | `<add name="Main" connectionString="" />`| `MAIN=Server=x` | `connectionString="Server=x"` |
//! | `<add key="Other" value="a" />`          | `APIURL=b`      | unchanged                  |
//!
//! ### Output
//!
//! A file is only written when at least one attribute changed. The whole document is
//! serialized again (indented), so formatting of untouched parts may change.
//!
//! see [run::run] for the per-file error handling
pub mod document;
pub mod environment;
pub mod resolver;
pub mod run;
pub mod substitute;
