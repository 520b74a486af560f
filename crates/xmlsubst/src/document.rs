//! xml configuration documents
//!
//! A [ConfigDocument] is the parsed tree of one file. Only the `<configuration>` root
//! and its direct section children (`<appSettings>`, `<connectionStrings>`, ...) are
//! interpreted; everything else is carried through untouched.
//!
//! ```xml
//! <configuration>
//!   <appSettings>
//!     <add key="ApiUrl" value="http://localhost" />
//!   </appSettings>
//!   <connectionStrings>
//!     <add name="Main" connectionString="Server=." />
//!   </connectionStrings>
//! </configuration>
//! ```
use xmltree::{Element, EmitterConfig, XMLNode};

pub const ROOT: &str = "configuration";
pub const ADD: &str = "add";
pub const APP_SETTINGS: &str = "appSettings";

#[derive(Debug, Clone)]
pub struct ConfigDocument {
    root: Element,
}

impl ConfigDocument {
    /// Parse raw file contents
    ///
    /// The encoding is detected by the xml reader (byte order mark or `encoding` in the
    /// xml declaration), so the input does not have to be utf-8.
    pub fn parse(bytes: impl AsRef<[u8]>) -> Result<Self, DocumentError> {
        let root = Element::parse(bytes.as_ref())?;
        Ok(Self { root })
    }

    /// Serialize as indented xml including the xml declaration
    pub fn to_xml(&self) -> Result<String, DocumentError> {
        let config = EmitterConfig::new()
            .perform_indent(true)
            .indent_string("  ");

        let mut buffer = Vec::new();
        self.root.write_with_config(&mut buffer, config)?;

        let mut text = String::from_utf8(buffer)?;
        text.push('\n');
        Ok(text)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// All `<add>` nodes of `configuration.<section>`, in document order
    ///
    /// Empty when the root is not `<configuration>` or the section does not exist.
    /// When a section appears more than once, only the first one is used.
    pub fn add_nodes_mut(&mut self, section: &str) -> Vec<AddNode<'_>> {
        if self.root.name != ROOT {
            return vec![];
        }

        let Some(section) = self.root.get_mut_child(section) else {
            return vec![];
        };

        section
            .children
            .iter_mut()
            .filter_map(|child| match child {
                XMLNode::Element(element) if element.name == ADD => Some(AddNode::new(element)),
                _ => None,
            })
            .collect()
    }
}

/// Mutable view of one `<add>` element
#[derive(derive_new::new, Debug)]
pub struct AddNode<'a> {
    element: &'a mut Element,
}

impl<'a> AddNode<'a> {
    pub const KEY: &'static str = "key";
    pub const VALUE: &'static str = "value";
    pub const NAME: &'static str = "name";
    pub const CONNECTION_STRING: &'static str = "connectionString";

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.element.attributes.get(name).map(String::as_str)
    }

    /// Sets an attribute, keeping its position if it already exists
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.element
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn key(&self) -> Option<&str> {
        self.attribute(Self::KEY)
    }

    pub fn value(&self) -> Option<&str> {
        self.attribute(Self::VALUE)
    }

    pub fn name(&self) -> Option<&str> {
        self.attribute(Self::NAME)
    }

    pub fn connection_string(&self) -> Option<&str> {
        self.attribute(Self::CONNECTION_STRING)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    #[error("Unable to parse xml: {0}")]
    Parse(#[from] xmltree::ParseError),
    #[error("Unable to write xml")]
    Write(#[from] xmltree::Error),
    #[error("Serialized xml is not valid utf-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}
