use hickory_proto::error::ProtoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("invalid DNS name: {0}")]
    Name(#[from] ProtoError),
}
