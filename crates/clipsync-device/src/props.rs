//! Decoding of opaque bus property payloads.
//!
//! Byte-valued properties (mount points in particular) cross the transport
//! as `{"type":"Buffer","data":[...]}` objects whose data ends in a single
//! terminating zero byte. Decoding strips that terminator; anything else is
//! an [`DeviceError::InvalidBuffer`].

use crate::error::{DeviceError, DeviceResult};
use serde_json::Value;
use std::path::PathBuf;

/// Decode a buffer-shaped property value into its bytes.
///
/// The trailing zero terminator is stripped. Non-buffer shapes, empty data,
/// and data without a trailing terminator all fail.
pub fn decode_buffer(value: &Value) -> DeviceResult<Vec<u8>> {
    let object = value
        .as_object()
        .filter(|o| o.get("type").and_then(Value::as_str) == Some("Buffer"))
        .ok_or_else(|| DeviceError::InvalidBuffer("not a buffer object".to_string()))?;

    let data = object
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| DeviceError::InvalidBuffer("buffer has no data array".to_string()))?;

    let bytes = data
        .iter()
        .map(|b| {
            b.as_u64()
                .filter(|b| *b <= u8::MAX as u64)
                .map(|b| b as u8)
                .ok_or_else(|| DeviceError::InvalidBuffer("buffer data is not bytes".to_string()))
        })
        .collect::<DeviceResult<Vec<u8>>>()?;

    match bytes.split_last() {
        Some((&0, rest)) => Ok(rest.to_vec()),
        _ => Err(DeviceError::InvalidBuffer("buffer is not null-terminated".to_string())),
    }
}

/// Decode a buffer-shaped property value into a filesystem path
pub fn decode_path(value: &Value) -> DeviceResult<PathBuf> {
    let bytes = decode_buffer(value)?;
    let path = String::from_utf8(bytes)
        .map_err(|_| DeviceError::InvalidBuffer("path is not valid UTF-8".to_string()))?;
    Ok(PathBuf::from(path))
}

/// Encode raw bytes into the buffer wire shape, appending the terminator.
///
/// Used by transports when they translate native byte arrays into event
/// payload metadata.
pub fn encode_buffer(bytes: &[u8]) -> Value {
    let mut data: Vec<Value> = bytes.iter().map(|b| Value::from(*b)).collect();
    data.push(Value::from(0u8));
    serde_json::json!({ "type": "Buffer", "data": data })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_buffer_strips_terminator() {
        let value = json!({ "type": "Buffer", "data": [47, 109, 110, 116, 0] });
        assert_eq!(decode_buffer(&value).unwrap(), b"/mnt");
    }

    #[test]
    fn test_decode_path() {
        let value = json!({ "type": "Buffer", "data": [47, 109, 110, 116, 0] });
        assert_eq!(decode_path(&value).unwrap(), PathBuf::from("/mnt"));
    }

    #[test]
    fn test_decode_buffer_requires_terminator() {
        let value = json!({ "type": "Buffer", "data": [47, 109, 110, 116] });
        let err = decode_buffer(&value).unwrap_err();
        assert!(matches!(err, DeviceError::InvalidBuffer(_)));
    }

    #[test]
    fn test_decode_buffer_rejects_non_buffer_shapes() {
        assert!(decode_buffer(&json!("/mnt")).is_err());
        assert!(decode_buffer(&json!({ "type": "Blob", "data": [0] })).is_err());
        assert!(decode_buffer(&json!({ "type": "Buffer" })).is_err());
        assert!(decode_buffer(&json!({ "type": "Buffer", "data": [300, 0] })).is_err());
    }

    #[test]
    fn test_decode_buffer_rejects_empty_data() {
        let value = json!({ "type": "Buffer", "data": [] });
        assert!(decode_buffer(&value).is_err());
    }

    #[test]
    fn test_encode_round_trip() {
        let encoded = encode_buffer(b"/media/kindle");
        assert_eq!(decode_buffer(&encoded).unwrap(), b"/media/kindle");
    }
}
