// Session error taxonomy. Only DeviceUnavailable and the window errors end
// the session; BadFrame and InvalidParameter are absorbed at the boundary
// where they occur.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The capture device could not be opened or died mid-session.
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),

    /// A frame arrived but is unusable (zero dimensions, short buffer,
    /// decode failure). Transient: the loop skips the tick and keeps going.
    #[error("bad frame: {0}")]
    BadFrame(String),

    /// A knob name or value the parameter store does not recognize.
    /// The previous value is retained.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("window init error: {0}")]
    WindowInit(String),

    #[error("window update error: {0}")]
    WindowUpdate(String),

    /// The recording sink failed to write a frame.
    #[error("record error: {0}")]
    Record(String),
}

impl Error {
    pub fn bad_frame(msg: impl Into<String>) -> Self {
        Self::BadFrame(msg.into())
    }

    pub fn device(msg: impl Into<String>) -> Self {
        Self::DeviceUnavailable(msg.into())
    }

    /// True for errors the loop absorbs rather than propagates.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::BadFrame(_) | Error::InvalidParameter(_))
    }
}
