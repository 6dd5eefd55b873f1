use clap::Args;

use common::risk;

#[derive(Args, Debug, Clone)]
pub struct Score {
    /// Plaintext gene data to score
    pub data: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("gene data must not be empty")]
    Empty,
}

#[async_trait::async_trait]
impl crate::op::Op for Score {
    type Error = ScoreError;
    type Output = u32;

    async fn execute(&self, _ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        if self.data.is_empty() {
            return Err(ScoreError::Empty);
        }
        Ok(risk::score(&self.data))
    }
}
