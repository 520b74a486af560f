//! environment substitution for `<add>` nodes
//!
//! Each `<add>` node is checked twice, independently:
//!
//! | **matched via** | **updates**        |
//! |-----------------|--------------------|
//! | `key`           | `value`            |
//! | `name`          | `connectionString` |
//!
//! An attribute is only rewritten when the environment holds a variable with the same
//! name (ignoring case) and its value differs from what is already in the document.
//! Running a substitution twice with the same environment never changes anything the
//! second time.
use crate::document::{AddNode, ConfigDocument};
use crate::environment::EnvironmentMap;
use serde::Serialize;

#[derive(Debug, Default)]
pub struct Substitution {
    /// `false` when none of the sections had an `<add>` node
    pub found_add_nodes: bool,
    changes: Vec<Change>,
}

impl Substitution {
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }
}

/// A single attribute rewrite
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub section: String,
    pub attribute: Target,
    /// text of the `key`/`name` attribute that matched
    pub matched: String,
    pub old: Option<String>,
    pub new: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Target {
    Value,
    ConnectionString,
}

impl Target {
    fn selector(&self) -> &'static str {
        match self {
            Target::Value => AddNode::KEY,
            Target::ConnectionString => AddNode::NAME,
        }
    }

    fn attribute(&self) -> &'static str {
        match self {
            Target::Value => AddNode::VALUE,
            Target::ConnectionString => AddNode::CONNECTION_STRING,
        }
    }
}

/// Substitute all `<add>` nodes of the given sections in place
pub fn substitute<S: AsRef<str>>(
    document: &mut ConfigDocument,
    environment: &EnvironmentMap,
    sections: &[S],
) -> Substitution {
    let mut substitution = Substitution::default();

    for section in sections {
        let section = section.as_ref();
        for mut node in document.add_nodes_mut(section) {
            substitution.found_add_nodes = true;
            for target in [Target::Value, Target::ConnectionString] {
                if let Some(change) = apply(&mut node, target, environment) {
                    tracing::info!(
                        section,
                        selector = change.attribute.selector(),
                        matched = %change.matched,
                        old = ?change.old,
                        new = %change.new,
                        "updated"
                    );
                    substitution.changes.push(Change {
                        section: section.to_string(),
                        ..change
                    });
                }
            }
        }
    }

    substitution
}

fn apply(node: &mut AddNode, target: Target, environment: &EnvironmentMap) -> Option<Change> {
    let selector = node.attribute(target.selector()).filter(|s| !s.is_empty())?;
    let new = environment.get(selector)?;

    let old = node.attribute(target.attribute());
    if old == Some(new) {
        return None;
    }

    let change = Change {
        section: String::new(),
        attribute: target,
        matched: selector.to_string(),
        old: old.map(ToString::to_string),
        new: new.to_string(),
    };
    node.set_attribute(target.attribute(), new);

    Some(change)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::document::APP_SETTINGS;
    use pretty_assertions::assert_eq;

    fn env(vars: &[(&str, &str)]) -> EnvironmentMap {
        vars.iter().copied().collect()
    }

    fn doc(xml: &str) -> ConfigDocument {
        ConfigDocument::parse(xml).expect("test document must parse")
    }

    fn app_settings(document: &mut ConfigDocument) -> Vec<(Option<String>, Option<String>)> {
        document
            .add_nodes_mut(APP_SETTINGS)
            .iter()
            .map(|node| {
                (
                    node.value().map(ToString::to_string),
                    node.connection_string().map(ToString::to_string),
                )
            })
            .collect()
    }

    #[test]
    fn key_matches_ignoring_case() {
        let mut document = doc(
            r#"<configuration><appSettings><add key="Foo" value="old"/></appSettings></configuration>"#,
        );

        for variable in ["FOO", "foo"] {
            let mut document = document.clone();
            let result = substitute(&mut document, &env(&[(variable, "bar")]), &[APP_SETTINGS]);

            assert!(result.changed());
            assert_eq!(app_settings(&mut document), vec![(Some("bar".into()), None)]);
        }

        let result = substitute(&mut document, &env(&[("Foo", "BaR")]), &[APP_SETTINGS]);
        assert_eq!(
            result.changes(),
            &[Change {
                section: APP_SETTINGS.into(),
                attribute: Target::Value,
                matched: "Foo".into(),
                old: Some("old".into()),
                new: "BaR".into(),
            }]
        );
    }

    #[test]
    fn missing_add_path_is_not_an_error() {
        let xml = r#"<configuration><runtime enabled="true"/></configuration>"#;
        let mut document = doc(xml);
        let before = document.root().clone();

        let result = substitute(&mut document, &env(&[("runtime", "x")]), &[APP_SETTINGS]);

        assert!(!result.changed());
        assert!(!result.found_add_nodes);
        assert_eq!(document.root(), &before);
    }

    #[test]
    fn unmatched_nodes_are_untouched() {
        let xml = r#"<configuration><appSettings>
            <add key="A" value="1" extra="keep"/>
            <add name="B" connectionString="2"/>
            <add/>
            <add key="" value="empty key"/>
        </appSettings></configuration>"#;
        let mut document = doc(xml);
        let before = document.root().clone();

        let result = substitute(&mut document, &env(&[("C", "3"), ("", "blank")]), &[APP_SETTINGS]);

        assert!(!result.changed());
        assert!(result.found_add_nodes);
        assert_eq!(document.root(), &before);
    }

    #[test]
    fn key_and_name_apply_independently() {
        let mut document = doc(
            r#"<configuration><appSettings>
                <add key="Api" value="old" name="Db" connectionString="old-db"/>
            </appSettings></configuration>"#,
        );

        let result = substitute(
            &mut document,
            &env(&[("API", "new"), ("DB", "Server=new")]),
            &[APP_SETTINGS],
        );

        assert_eq!(result.changes().len(), 2);
        assert_eq!(
            app_settings(&mut document),
            vec![(Some("new".into()), Some("Server=new".into()))]
        );
    }

    #[test]
    fn absent_value_is_added() {
        let mut document =
            doc(r#"<configuration><appSettings><add key="Api"/></appSettings></configuration>"#);

        let result = substitute(&mut document, &env(&[("api", "x")]), &[APP_SETTINGS]);

        assert_eq!(result.changes()[0].old, None);
        assert_eq!(app_settings(&mut document), vec![(Some("x".into()), None)]);
    }

    #[test]
    fn duplicate_keys_are_each_updated() {
        let mut document = doc(
            r#"<configuration><appSettings>
                <add key="Dup" value="a"/>
                <add key="dup" value="b"/>
                <add key="DUP" value="same"/>
            </appSettings></configuration>"#,
        );

        let result = substitute(&mut document, &env(&[("DUP", "same")]), &[APP_SETTINGS]);

        assert_eq!(result.changes().len(), 2);
        assert_eq!(
            app_settings(&mut document),
            vec![
                (Some("same".into()), None),
                (Some("same".into()), None),
                (Some("same".into()), None),
            ]
        );
    }

    #[test]
    fn second_run_changes_nothing() {
        let mut document = doc(
            r#"<configuration><appSettings>
                <add key="One" value="1"/>
                <add name="Two" connectionString="2"/>
            </appSettings></configuration>"#,
        );
        let environment = env(&[("ONE", "uno"), ("TWO", "dos")]);

        assert!(substitute(&mut document, &environment, &[APP_SETTINGS]).changed());
        assert!(!substitute(&mut document, &environment, &[APP_SETTINGS]).changed());
    }

    #[test]
    fn only_enabled_sections_are_touched() {
        let xml = r#"<configuration>
            <appSettings><add key="Shared" value="a"/></appSettings>
            <connectionStrings><add name="Shared" connectionString="b"/></connectionStrings>
        </configuration>"#;
        let environment = env(&[("shared", "z")]);

        let mut document = doc(xml);
        let result = substitute(&mut document, &environment, &[APP_SETTINGS]);
        assert_eq!(result.changes().len(), 1);
        assert_eq!(
            document.add_nodes_mut("connectionStrings")[0].connection_string(),
            Some("b")
        );

        let mut document = doc(xml);
        let result = substitute(
            &mut document,
            &environment,
            &[APP_SETTINGS, "connectionStrings"],
        );
        let sections: Vec<_> = result.changes().iter().map(|c| c.section.as_str()).collect();
        assert_eq!(sections, vec![APP_SETTINGS, "connectionStrings"]);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn update_is_logged_with_selector() {
        let captured = CapturedLogs::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let mut document = doc(
            r#"<configuration><appSettings><add name="Db" connectionString="old"/></appSettings></configuration>"#,
        );
        tracing::subscriber::with_default(subscriber, || {
            substitute(&mut document, &env(&[("db", "new")]), &[APP_SETTINGS]);
        });

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains(r#"selector="name""#), "{logs}");
        assert!(!logs.contains("target="), "{logs}");
    }

    #[test]
    fn change_list_snapshot() {
        let mut document = doc(
            r#"<configuration><appSettings>
                <add key="ApiUrl" value="http://old"/>
                <add key="Untouched" value="1"/>
                <add name="Main"/>
            </appSettings></configuration>"#,
        );

        let result = substitute(
            &mut document,
            &env(&[("APIURL", "http://new"), ("main", "Server=db")]),
            &[APP_SETTINGS],
        );

        insta::assert_debug_snapshot!(result.changes(), @r###"
        [
            Change {
                section: "appSettings",
                attribute: Value,
                matched: "ApiUrl",
                old: Some(
                    "http://old",
                ),
                new: "http://new",
            },
            Change {
                section: "appSettings",
                attribute: ConnectionString,
                matched: "Main",
                old: None,
                new: "Server=db",
            },
        ]
        "###);
    }
}
