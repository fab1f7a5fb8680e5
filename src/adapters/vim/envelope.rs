//! Request bodies for the vSphere Web Services (`urn:vim25`) calls used by the session

use quick_xml::escape::escape;

use crate::domain::ObjectKind;

/// Reference to a server side managed object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoRef {
    pub kind: String,
    pub value: String,
}

impl MoRef {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }

    pub fn service_instance() -> Self {
        Self::new("ServiceInstance", "ServiceInstance")
    }

    fn to_xml(&self, tag: &str) -> String {
        format!(
            r#"<{tag} type="{}">{}</{tag}>"#,
            escape(self.kind.as_str()),
            escape(self.value.as_str()),
        )
    }
}

/// Page size requested from the property collector
pub const MAX_OBJECTS: usize = 100;

fn envelope(body: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" "#,
            r#"xmlns:xsd="http://www.w3.org/2001/XMLSchema" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<soapenv:Body>{}</soapenv:Body></soapenv:Envelope>"
        ),
        body
    )
}

fn method(name: &str, this: &MoRef, arguments: &str) -> String {
    envelope(&format!(
        r#"<{name} xmlns="urn:vim25">{}{arguments}</{name}>"#,
        this.to_xml("_this")
    ))
}

pub fn retrieve_service_content() -> String {
    method("RetrieveServiceContent", &MoRef::service_instance(), "")
}

pub fn login(session_manager: &MoRef, username: &str, password: &str) -> String {
    method(
        "Login",
        session_manager,
        &format!(
            "<userName>{}</userName><password>{}</password>",
            escape(username),
            escape(password)
        ),
    )
}

pub fn logout(session_manager: &MoRef) -> String {
    method("Logout", session_manager, "")
}

pub fn create_container_view(view_manager: &MoRef, container: &MoRef, kind: ObjectKind) -> String {
    method(
        "CreateContainerView",
        view_manager,
        &format!(
            "{}<type>{}</type><recursive>true</recursive>",
            container.to_xml("container"),
            kind.as_str()
        ),
    )
}

pub fn destroy_view(view: &MoRef) -> String {
    method("DestroyView", view, "")
}

/// Retrieve `properties` of every `kind` object reachable through a container view
pub fn retrieve_properties(
    property_collector: &MoRef,
    view: &MoRef,
    kind: ObjectKind,
    properties: &[&str],
) -> String {
    let path_set: String = properties
        .iter()
        .map(|p| format!("<pathSet>{}</pathSet>", escape(*p)))
        .collect();

    let spec_set = format!(
        concat!(
            "<specSet>",
            "<propSet><type>{kind}</type><all>false</all>{path_set}</propSet>",
            "<objectSet>{view}<skip>true</skip>",
            r#"<selectSet xsi:type="TraversalSpec">"#,
            "<name>traverseEntities</name><type>ContainerView</type><path>view</path><skip>false</skip>",
            "</selectSet>",
            "</objectSet>",
            "</specSet>",
            "<options><maxObjects>{max}</maxObjects></options>"
        ),
        kind = kind.as_str(),
        path_set = path_set,
        view = view.to_xml("obj"),
        max = MAX_OBJECTS,
    );

    method("RetrievePropertiesEx", property_collector, &spec_set)
}

pub fn continue_retrieve_properties(property_collector: &MoRef, token: &str) -> String {
    method(
        "ContinueRetrievePropertiesEx",
        property_collector,
        &format!("<token>{}</token>", escape(token)),
    )
}
