//! Error types for `StormSod`

use thiserror::Error;

/// The error type for `StormSod` operations.
///
/// Every variant is terminal for the decode or encode call that produced it.
/// Unknown node types and lighting models are not errors; they fall back to a
/// default and are reported through `tracing` instead.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Container Errors ====================
    /// Neither the `Storm3D_SW` nor the `StarTrekDB` signature was found.
    #[error("Storm3D_SW signature not found")]
    SignatureNotFound,

    /// The input is a `StarTrekDB` database, not a Storm3D object.
    #[error("found StarTrekDB database signature at offset {offset}, expected Storm3D_SW")]
    WrongFileKind {
        /// Byte offset of the database signature.
        offset: usize,
    },

    /// The SOD version has no defined data layout.
    #[error("unsupported SOD version: {version} (supported: above 1.6001)")]
    UnsupportedVersion {
        /// The version number found in the file or document.
        version: f32,
    },

    // ==================== Stream Errors ====================
    /// The stream ended before a field could be read.
    #[error("unexpected end of data at offset {offset}")]
    UnexpectedEndOfData {
        /// Byte offset of the read that failed.
        offset: u64,
    },

    /// A string contained a byte outside the ASCII range.
    #[error("malformed string (non-ASCII byte): {0:?}")]
    MalformedString(String),

    /// A mesh node did not end with the zero end-of-node marker.
    #[error("invalid end of node '{node}': must be 0 but is {value}")]
    InvalidEndOfNode {
        /// Id of the mesh node being read.
        node: String,
        /// The trailer value found.
        value: u16,
    },

    /// An animation channel used a type tag other than position (0) or scale (5).
    #[error("unknown animation type {tag} in channel for node '{node}'")]
    UnknownAnimationType {
        /// Node the channel refers to.
        node: String,
        /// The type tag found.
        tag: u16,
    },

    /// A texture animation reference did not start with the fixed tag 4.
    #[error("invalid animation reference tag: expected 4, found {tag}")]
    InvalidAnimationReferenceTag {
        /// The tag found.
        tag: u8,
    },

    // ==================== Encoding Errors ====================
    /// A node's payload does not match its node type.
    #[error("node '{node}' has type {node_type} but a {payload} payload")]
    PayloadTypeMismatch {
        /// Id of the offending node.
        node: String,
        /// The declared node type.
        node_type: &'static str,
        /// The payload variant supplied.
        payload: &'static str,
    },

    /// An animation channel's keyframes do not match its type tag.
    #[error("channel for node '{node}' has type {animation_type} but {keyframes} keyframes")]
    KeyframeTypeMismatch {
        /// Node the channel refers to.
        node: String,
        /// The declared animation type.
        animation_type: &'static str,
        /// The keyframe variant supplied.
        keyframes: &'static str,
    },

    /// The document version requires a borgification record the mesh lacks.
    #[error("mesh '{node}' needs a borgification record at version {version}")]
    MissingBorgification {
        /// Id of the mesh node.
        node: String,
        /// The document version.
        version: f32,
    },

    /// The mesh carries a borgification record its document version cannot store.
    #[error("mesh '{node}' has a borgification record, but version {version} has none")]
    UnexpectedBorgification {
        /// Id of the mesh node.
        node: String,
        /// The document version.
        version: f32,
    },

    /// The borg bump-map texture must be present exactly when bump-map mode is 2.
    #[error("mesh '{node}' bump-map mode {mode} disagrees with its borg bump-map texture")]
    BorgBumpMapMismatch {
        /// Id of the mesh node.
        node: String,
        /// The bump-map mode.
        mode: u32,
    },

    /// A string does not fit the 16-bit length prefix.
    #[error("string too long for SOD: {length} bytes (max 65535)")]
    StringTooLong {
        /// Length of the string in bytes.
        length: usize,
    },

    /// A collection does not fit its 16-bit count prefix.
    #[error("too many {what}: {count} (max 65535)")]
    CollectionTooLarge {
        /// What kind of element overflowed.
        what: &'static str,
        /// The number of elements.
        count: usize,
    },

    // ==================== Serialization Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for `StormSod` operations.
pub type Result<T> = std::result::Result<T, Error>;
