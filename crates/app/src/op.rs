use std::error::Error;
use std::path::PathBuf;

use crate::state::{AppConfig, AppState, StateError};

#[derive(Debug, Clone)]
pub struct OpContext {
    /// Optional custom state directory (defaults to ~/.genevault)
    pub config_path: Option<PathBuf>,
    /// Config loaded from the state directory, or defaults when there is none
    pub config: AppConfig,
}

impl OpContext {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        let config = AppState::load(config_path.clone())
            .map(|state| state.config)
            .unwrap_or_default();
        Self {
            config_path,
            config,
        }
    }

    /// Load the state directory, or `None` if it has not been initialized
    pub fn state(&self) -> Result<Option<AppState>, StateError> {
        match AppState::load(self.config_path.clone()) {
            Ok(state) => Ok(Some(state)),
            Err(StateError::NotInitialized) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
