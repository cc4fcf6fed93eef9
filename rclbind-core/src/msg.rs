//! Message and service type traits.
//!
//! A type's *type support* is the metadata the middleware needs to move it
//! across the wire. It is produced once, by the type's import step
//! ([`TypeSupport::import_type_support`]), and memoized by the
//! [`TypeSupportRegistry`](crate::TypeSupportRegistry).

use crate::error::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};

/// Whether a descriptor describes a message or a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A topic message.
    Message,
    /// A request/response service pair.
    Service,
}

/// Resolved type support of a message or service type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    name: String,
    kind: TypeKind,
}

impl TypeDescriptor {
    /// Descriptor of a message type, e.g. `std_msgs/msg/String`.
    pub fn message(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Message,
        }
    }

    /// Descriptor of a service type, e.g. `example_interfaces/srv/AddTwoInts`.
    pub fn service(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Service,
        }
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Message or service.
    pub fn kind(&self) -> TypeKind {
        self.kind
    }
}

/// Trait for message types that can be published and subscribed.
pub trait TypeSupport: 'static + Send + Sync + Sized {
    /// Fully qualified type name, e.g. `std_msgs/msg/String`.
    fn type_name() -> &'static str;

    /// One-time import of the type support.
    ///
    /// Returns `None` when the support library for this type is not
    /// available, in which case no endpoint can be created for it.
    fn import_type_support() -> Option<TypeDescriptor> {
        Some(TypeDescriptor::message(Self::type_name()))
    }

    /// Serialize this message.
    fn to_bytes(&self) -> Result<Vec<u8>>;

    /// Deserialize a message.
    fn from_bytes(bytes: &[u8]) -> Result<Self>;
}

/// Trait for service types.
pub trait ServiceMsg: 'static + Send + Sync {
    /// The request message type.
    type Request: TypeSupport;

    /// The response message type.
    type Response: TypeSupport;

    /// Fully qualified type name, e.g. `example_interfaces/srv/AddTwoInts`.
    fn type_name() -> &'static str;

    /// One-time import of the type support, see [`TypeSupport::import_type_support`].
    fn import_type_support() -> Option<TypeDescriptor> {
        Some(TypeDescriptor::service(Self::type_name()))
    }
}

/// CDR Little Endian encapsulation header.
pub const CDR_LE_HEADER: [u8; 4] = [0x00, 0x01, 0x00, 0x00];

/// Serialize a serde value as CDR (little endian) with its encapsulation header.
///
/// Convenient for implementing [`TypeSupport::to_bytes`] on serde types.
pub fn to_cdr<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut result = CDR_LE_HEADER.to_vec();
    let buffer = cdr_encoding::to_vec::<T, byteorder::LittleEndian>(value)
        .map_err(|e| Error::Serialization(e.to_string()))?;
    result.extend(buffer);
    Ok(result)
}

/// Deserialize a value written by [`to_cdr`].
pub fn from_cdr<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    if bytes.len() < CDR_LE_HEADER.len() {
        return Err(Error::Serialization(format!(
            "Bad encoding {} is less than 4",
            bytes.len()
        )));
    }
    if bytes[..2] != CDR_LE_HEADER[..2] {
        return Err(Error::Serialization(format!(
            "Unsupported representation identifier 0x{:02x}{:02x}",
            bytes[0], bytes[1]
        )));
    }
    let (value, _) = cdr_encoding::from_bytes::<T, byteorder::LittleEndian>(&bytes[4..])
        .map_err(|e| Error::Serialization(e.to_string()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Pose {
        x: f64,
        label: String,
    }

    #[test]
    fn test_cdr_header_and_payload() {
        let pose = Pose {
            x: 1.5,
            label: "base".into(),
        };
        let bytes = to_cdr(&pose).unwrap();
        assert_eq!(bytes[..4], CDR_LE_HEADER);
        assert_eq!(from_cdr::<Pose>(&bytes).unwrap(), pose);
    }

    #[test]
    fn test_cdr_rejects_bad_input() {
        assert!(matches!(
            from_cdr::<Pose>(&[0, 1]),
            Err(Error::Serialization(_))
        ));
        assert!(matches!(
            from_cdr::<Pose>(&[0, 7, 0, 0, 1]),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_descriptors() {
        let d = TypeDescriptor::service("example_interfaces/srv/AddTwoInts");
        assert_eq!(d.kind(), TypeKind::Service);
        assert_eq!(d.name(), "example_interfaces/srv/AddTwoInts");
        assert_eq!(TypeDescriptor::message("a/msg/B").kind(), TypeKind::Message);
    }
}
