//! UseCase layer: the relay operations shared by every transport binding.

mod broadcast_message;
mod register_connection;
mod release_connection;

pub use broadcast_message::{BroadcastMessageUseCase, BroadcastSummary};
pub use register_connection::RegisterConnectionUseCase;
pub use release_connection::{ReleaseConnectionUseCase, ReleaseSummary};
