use tracing::debug;

use crate::domain::ManagedObject;
use crate::ports::{SessionError, SessionResult};

use super::envelope::MoRef;
use super::xml::Element;

/// Well-known managed objects of a service instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceContent {
    pub root_folder: MoRef,
    pub property_collector: MoRef,
    pub view_manager: MoRef,
    pub session_manager: MoRef,
}

/// One page of a property collector result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrieveResult {
    pub objects: Vec<ManagedObject>,
    pub token: Option<String>,
}

fn protocol(message: impl Into<String>) -> SessionError {
    SessionError::Protocol(message.into())
}

/// Extract the method response from a SOAP envelope, turning faults into errors
pub fn parse_body(content: &str, status: reqwest::StatusCode) -> SessionResult<Element> {
    let envelope = match Element::parse(content) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(protocol(format!("Unexpected HTTP status {}", status)))
        }
        Err(e) => return Err(e),
    };

    let body = envelope
        .children
        .into_iter()
        .find(|c| c.name == "Body")
        .ok_or_else(|| protocol("SOAP envelope without body"))?;

    if let Some(fault) = body.child("Fault") {
        return Err(SessionError::Fault {
            code: fault_name(fault),
            message: fault.child_text("faultstring").unwrap_or_default().to_string(),
        });
    }

    if !status.is_success() {
        return Err(protocol(format!("Unexpected HTTP status {}", status)));
    }

    body.children
        .into_iter()
        .next()
        .ok_or_else(|| protocol("SOAP body without response"))
}

/// Most specific fault type: the detail's xsi:type, else the SOAP fault code
fn fault_name(fault: &Element) -> String {
    fault
        .child("detail")
        .and_then(|d| d.children.first())
        .map(|d| d.attr("type").unwrap_or(d.name.trim_end_matches("Fault")).to_string())
        .or_else(|| fault.child_text("faultcode").map(str::to_string))
        .unwrap_or_else(|| "Fault".to_string())
}

fn moref(element: &Element) -> SessionResult<MoRef> {
    let kind = element
        .attr("type")
        .ok_or_else(|| protocol(format!("{} without type", element.name)))?;
    Ok(MoRef::new(kind, element.text.trim()))
}

fn returnval(response: &Element) -> SessionResult<&Element> {
    response
        .child("returnval")
        .ok_or_else(|| protocol(format!("{} without returnval", response.name)))
}

pub fn service_content(response: &Element) -> SessionResult<ServiceContent> {
    let content = returnval(response)?;
    let field = |name: &str| {
        content
            .child(name)
            .ok_or_else(|| protocol(format!("ServiceContent without {}", name)))
            .and_then(moref)
    };

    Ok(ServiceContent {
        root_folder: field("rootFolder")?,
        property_collector: field("propertyCollector")?,
        view_manager: field("viewManager")?,
        session_manager: field("sessionManager")?,
    })
}

pub fn container_view(response: &Element) -> SessionResult<MoRef> {
    moref(returnval(response)?)
}

/// Decode a RetrievePropertiesEx or ContinueRetrievePropertiesEx response
pub fn retrieve_result(response: &Element) -> SessionResult<RetrieveResult> {
    // No matching objects at all is an empty response
    let Some(result) = response.child("returnval") else {
        return Ok(RetrieveResult::default());
    };

    let mut objects = Vec::new();
    for content in result.children("objects") {
        let obj = content
            .child("obj")
            .ok_or_else(|| protocol("ObjectContent without obj"))?;
        let mut object = ManagedObject::new(obj.text.trim());

        for prop in content.children("propSet") {
            let name = prop
                .child_text("name")
                .ok_or_else(|| protocol("DynamicProperty without name"))?;
            let value = prop.child_text("val").unwrap_or_default();
            object = object.with_property(name, value);
        }

        for missing in content.children("missingSet") {
            debug!(
                "{} is missing property {}",
                object.reference,
                missing.child_text("path").unwrap_or_default()
            );
        }

        objects.push(object);
    }

    Ok(RetrieveResult {
        objects,
        token: result
            .child_text("token")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string),
    })
}
