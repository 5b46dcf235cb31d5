//! Upload validation shared by the media backends. The composer only
//! accepts `image/*`; the stores enforce it on the actual bytes.

use bytes::Bytes;
use domains::{GatewayError, Result};

/// Rejects uploads whose declared type is not `image/*` or whose bytes do
/// not carry a recognizable raster-image signature.
pub(crate) fn require_image(data: &Bytes, content_type: &mime::Mime) -> Result<()> {
    if content_type.type_() != mime::IMAGE {
        return Err(GatewayError::Validation(format!(
            "unsupported content type: {content_type}"
        )));
    }
    image::guess_format(data)
        .map(|_| ())
        .map_err(|_| GatewayError::Validation("unrecognized image data".to_string()))
}
