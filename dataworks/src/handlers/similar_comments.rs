//! Find the most similar pair of comments by embedding cosine similarity.

use async_trait::async_trait;

use crate::errors::HandlerError;
use crate::extract::SlotBindings;
use crate::handlers::{read_to_string, require, write_output, HandlerContext};
use crate::registry::Handler;

pub struct SimilarCommentsHandler;

#[async_trait]
impl Handler for SimilarCommentsHandler {
    async fn run(
        &self,
        ctx: &HandlerContext,
        params: &SlotBindings,
    ) -> Result<String, HandlerError> {
        let input = ctx.resolve(require(params, "input")?);
        let output = ctx.resolve(require(params, "output")?);

        let content = read_to_string(&input)?;
        let comments: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        if comments.len() < 2 {
            return Err(HandlerError::Malformed(format!(
                "need at least two comments to compare, found {} in {}",
                comments.len(),
                input.display()
            )));
        }

        let embeddings = ctx.oracle.embed(&comments).await?;
        let (a, b) = most_similar_pair(&embeddings).ok_or_else(|| {
            HandlerError::Malformed("embeddings produced no comparable pair".to_string())
        })?;

        // Input order, one comment per line.
        write_output(&output, &format!("{}\n{}\n", comments[a], comments[b]))?;
        Ok(format!(
            "most similar pair of {} comments from {} -> {}",
            comments.len(),
            input.display(),
            output.display()
        ))
    }
}

/// Indices of the most similar pair, `(i, j)` with `i < j`.
pub fn most_similar_pair(embeddings: &[Vec<f32>]) -> Option<(usize, usize)> {
    let mut best: Option<(f32, usize, usize)> = None;
    for i in 0..embeddings.len() {
        for j in (i + 1)..embeddings.len() {
            let score = cosine_similarity(&embeddings[i], &embeddings[j]);
            if best.map(|(s, _, _)| score > s).unwrap_or(true) {
                best = Some((score, i, j));
            }
        }
    }
    best.map(|(_, i, j)| (i, j))
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
