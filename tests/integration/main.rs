//! End-to-end tests: world files on disk through a full play session.

mod play;
