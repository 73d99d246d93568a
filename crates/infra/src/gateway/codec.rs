//! Atom envelope codec for the email gateway resource
//!
//! Requests look like:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <atom:entry xmlns:atom="http://www.w3.org/2005/Atom"
//!             xmlns:apps="http://schemas.google.com/apps/2006">
//!   <apps:property name="smartHost" value="smtp.example.com"/>
//!   <apps:property name="smtpMode" value="SMTP_TLS"/>
//! </atom:entry>
//! ```
//!
//! Responses wrap the same properties in a fuller entry (`id`, `updated`,
//! `link`, ...) and do not guarantee their order, so decoding collects them
//! by name.

use std::io::Cursor;

use mailroute_domain::constants::{APPS_NAMESPACE, ATOM_NAMESPACE};
use mailroute_domain::{DomainName, GatewayConfig, GatewayProperty, MailrouteError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::errors::InfraError;

const ROOT_ELEMENT: &str = "atom:entry";
const PROPERTY_ELEMENT: &str = "apps:property";

/// Serialize `config` into the request envelope.
///
/// Always writes exactly two properties, `smartHost` then `smtpMode`.
///
/// # Errors
/// Returns `MailrouteError::Protocol` if the writer fails.
pub fn encode(config: &GatewayConfig) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new(ROOT_ELEMENT);
    root.push_attribute(("xmlns:atom", ATOM_NAMESPACE));
    root.push_attribute(("xmlns:apps", APPS_NAMESPACE));
    write(&mut writer, Event::Start(root))?;

    for property in config.to_properties() {
        let mut element = BytesStart::new(PROPERTY_ELEMENT);
        element.push_attribute(("name", property.name.as_str()));
        element.push_attribute(("value", property.value.as_str()));
        write(&mut writer, Event::Empty(element))?;
    }

    write(&mut writer, Event::End(BytesEnd::new(ROOT_ELEMENT)))?;

    Ok(writer.into_inner().into_inner())
}

fn write(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| MailrouteError::Protocol(format!("failed to write gateway XML: {e}")))
}

/// Collect the `property` children of a response envelope.
///
/// Only direct children of the root are considered. Namespace prefixes are
/// ignored on both elements and attributes.
///
/// # Errors
/// Returns `MailrouteError::Protocol` when the document is not well formed,
/// its root is not an `entry`, or a property has no `name`.
pub fn decode(bytes: &[u8]) -> Result<Vec<GatewayProperty>> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut properties = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(InfraError::from)? {
            Event::Start(element) => {
                if depth == 0 {
                    check_root(&element, seen_root)?;
                    seen_root = true;
                } else if depth == 1 && is_property(&element) {
                    properties.push(read_property(&element)?);
                }
                depth += 1;
            }
            Event::Empty(element) => {
                if depth == 0 {
                    check_root(&element, seen_root)?;
                    seen_root = true;
                } else if depth == 1 && is_property(&element) {
                    properties.push(read_property(&element)?);
                }
            }
            Event::End(_) => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    MailrouteError::Protocol("unbalanced closing tag in gateway XML".into())
                })?;
            }
            Event::Text(_) | Event::CData(_) if depth == 0 => {
                return Err(MailrouteError::Protocol(
                    "unexpected text outside the gateway entry".into(),
                ));
            }
            Event::Eof => {
                if depth > 0 {
                    return Err(MailrouteError::Protocol(
                        "gateway XML ended before the entry was closed".into(),
                    ));
                }
                if !seen_root {
                    return Err(MailrouteError::Protocol("gateway XML has no root element".into()));
                }
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(properties)
}

/// Decode a response envelope straight into a [`GatewayConfig`].
///
/// # Errors
/// Everything [`decode`] reports, plus `Protocol` for an unknown `smtpMode`.
pub fn decode_config(domain: DomainName, bytes: &[u8]) -> Result<GatewayConfig> {
    let properties = decode(bytes)?;
    GatewayConfig::from_properties(domain, &properties)
}

fn check_root(element: &BytesStart<'_>, seen_root: bool) -> Result<()> {
    if seen_root {
        return Err(MailrouteError::Protocol("gateway XML has more than one root element".into()));
    }
    if element.local_name().as_ref() != b"entry" {
        return Err(MailrouteError::Protocol(format!(
            "expected an entry envelope, got <{}>",
            String::from_utf8_lossy(element.name().as_ref())
        )));
    }
    Ok(())
}

fn is_property(element: &BytesStart<'_>) -> bool {
    element.local_name().as_ref() == b"property"
}

fn read_property(element: &BytesStart<'_>) -> Result<GatewayProperty> {
    let mut name = None;
    let mut value = None;

    for attribute in element.attributes() {
        let attribute = attribute.map_err(InfraError::from)?;
        let target = match attribute.key.local_name().as_ref() {
            b"name" => &mut name,
            b"value" => &mut value,
            _ => continue,
        };
        let unescaped = attribute.unescape_value().map_err(|e| {
            MailrouteError::Protocol(format!("invalid property attribute value: {e}"))
        })?;
        *target = Some(unescaped.into_owned());
    }

    let name = name.ok_or_else(|| {
        MailrouteError::Protocol("gateway property is missing its name attribute".into())
    })?;

    Ok(GatewayProperty { name, value: value.unwrap_or_default() })
}
