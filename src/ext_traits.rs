//! Extension traits for encoding requests and decoding gateway bodies

use error_stack::ResultExt;
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::{self, CustomResult};

pub trait Encode: Serialize {
    /// Serialize `self` into a compact JSON string
    fn encode_to_string_of_json(&self) -> CustomResult<String, errors::ConnectorError>
    where
        Self: Sized,
    {
        serde_json::to_string(self)
            .change_context(errors::ConnectorError::RequestEncodingFailed)
            .attach_printable_lazy(|| {
                format!("Unable to convert {} to a JSON string", std::any::type_name::<Self>())
            })
    }
}

impl<A: Serialize> Encode for A {}

pub trait BytesExt {
    /// Deserialize a JSON byte slice into `T`, naming `type_name` in the error
    fn parse_struct<T>(&self, type_name: &'static str) -> CustomResult<T, errors::ConnectorError>
    where
        T: DeserializeOwned;
}

impl BytesExt for bytes::Bytes {
    fn parse_struct<T>(&self, type_name: &'static str) -> CustomResult<T, errors::ConnectorError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice::<T>(self)
            .change_context(errors::ConnectorError::ResponseDeserializationFailed)
            .attach_printable_lazy(|| format!("Unable to parse {type_name} from bytes"))
    }
}
