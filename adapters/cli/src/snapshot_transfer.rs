use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use find_gold_core::MazeSnapshot;
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "maze";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "maze:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes a maze snapshot into a single-line string suitable for clipboard transfer.
pub(crate) fn encode(snapshot: &MazeSnapshot) -> Result<String, SnapshotTransferError> {
    let json = serde_json::to_vec(snapshot).map_err(SnapshotTransferError::Serialize)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!(
        "{SNAPSHOT_HEADER}:{}x{}:{encoded}",
        snapshot.columns(),
        snapshot.rows()
    ))
}

/// Decodes a maze snapshot from its transfer string.
pub(crate) fn decode(value: &str) -> Result<MazeSnapshot, SnapshotTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SnapshotTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(SnapshotTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(SnapshotTransferError::MissingVersion)?;
    let dimensions = parts
        .next()
        .ok_or(SnapshotTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(SnapshotTransferError::MissingPayload)?;

    if domain != SNAPSHOT_DOMAIN {
        return Err(SnapshotTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != SNAPSHOT_VERSION {
        return Err(SnapshotTransferError::UnsupportedVersion(version.to_owned()));
    }

    let (columns, rows) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(SnapshotTransferError::InvalidEncoding)?;
    let snapshot: MazeSnapshot =
        serde_json::from_slice(&bytes).map_err(SnapshotTransferError::InvalidPayload)?;

    if (snapshot.columns(), snapshot.rows()) != (columns, rows) {
        return Err(SnapshotTransferError::DimensionMismatch {
            header: (columns, rows),
            payload: (snapshot.columns(), snapshot.rows()),
        });
    }
    if !snapshot.is_well_formed() {
        return Err(SnapshotTransferError::Malformed);
    }

    Ok(snapshot)
}

/// Errors that can occur while encoding or decoding maze transfer strings.
#[derive(Debug, Error)]
pub(crate) enum SnapshotTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("maze string was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    #[error("maze string is missing the prefix")]
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    #[error("maze string is missing the version")]
    MissingVersion,
    /// The encoded snapshot did not include grid dimensions.
    #[error("maze string is missing the grid dimensions")]
    MissingDimensions,
    /// The encoded snapshot did not include the payload segment.
    #[error("maze string is missing the payload")]
    MissingPayload,
    /// The encoded snapshot used an unexpected prefix segment.
    #[error("maze prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    #[error("maze version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded snapshot.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The header dimensions disagree with the payload.
    #[error("header says {}x{} but payload holds {}x{}", .header.0, .header.1, .payload.0, .payload.1)]
    DimensionMismatch {
        /// Dimensions from the header segment.
        header: (u32, u32),
        /// Dimensions from the decoded payload.
        payload: (u32, u32),
    },
    /// The payload decoded but its cells are out of order or its exit is out of bounds.
    #[error("maze payload is malformed")]
    Malformed,
    /// The base64 payload could not be decoded.
    #[error("could not decode maze payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse maze payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The snapshot could not be serialised.
    #[error("could not serialise maze: {0}")]
    Serialize(#[source] serde_json::Error),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), SnapshotTransferError> {
    let invalid = || SnapshotTransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;

    if columns == 0 || rows == 0 {
        return Err(invalid());
    }

    Ok((columns, rows))
}
