pub mod init;
pub mod keygen;
pub mod run;
pub mod score;
pub mod version;

pub use init::Init;
pub use keygen::Keygen;
pub use run::Run;
pub use score::Score;
pub use version::Version;
