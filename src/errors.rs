use std::fmt::Debug;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReceiptForgeError {
    /// Malformed receipt JSON, or a required field is missing.
    #[error("Invalid receipt input: {message}.")]
    InputDecode {
        message: &'static str,
        debug: Option<String>,
    },

    /// A field value cannot be represented in its target binary type.
    #[error("Failed to encode receipt payload: {message}.")]
    Encoding {
        message: &'static str,
        debug: Option<String>,
    },

    /// Key or certificate material is unreadable or unparseable.
    #[error("Invalid signing credentials: {message}.")]
    Credential {
        message: &'static str,
        debug: Option<String>,
    },

    #[error("Failed to sign receipt: {message}.")]
    Signing {
        message: &'static str,
        debug: Option<String>,
    },
}

macro_rules! define_error_constructors {
    ($kind:ident, $variant:ident) => {
        pub struct $kind;

        impl $kind {
            pub fn new(message: &'static str) -> ReceiptForgeError {
                ReceiptForgeError::$variant {
                    message,
                    debug: None,
                }
            }

            pub fn with_debug(message: &'static str, debug: &impl Debug) -> ReceiptForgeError {
                ReceiptForgeError::$variant {
                    message,
                    debug: Some(format!("{:?}", debug)),
                }
            }
        }
    };
}

define_error_constructors!(InputDecodeError, InputDecode);
define_error_constructors!(EncodingError, Encoding);
define_error_constructors!(CredentialError, Credential);
define_error_constructors!(SigningError, Signing);

impl ReceiptForgeError {
    /// Debug details of the underlying cause, if any. Not part of the display
    /// message.
    pub fn debug(&self) -> Option<&str> {
        match self {
            ReceiptForgeError::InputDecode { debug, .. }
            | ReceiptForgeError::Encoding { debug, .. }
            | ReceiptForgeError::Credential { debug, .. }
            | ReceiptForgeError::Signing { debug, .. } => debug.as_deref(),
        }
    }
}
