// Sliding-window detection of contiguous high-density regions
use serde::{Deserialize, Serialize};

use crate::density::stats;

/// Contiguous run of sentences with high windowed density
///
/// `start` and `end` are inclusive sentence indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityCluster {
    pub start: usize,
    pub end: usize,
    pub mean_density: f64,
}

impl DensityCluster {
    pub fn sentence_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Finds clusters by sliding a fixed window over the density sequence
pub struct ClusterDetector {
    window_size: usize,
    density_threshold: f64,
    /// Edge sentences below this density are trimmed off a cluster
    edge_floor: f64,
}

impl ClusterDetector {
    pub fn new(window_size: usize, density_threshold: f64, edge_floor: f64) -> Self {
        Self {
            window_size,
            density_threshold,
            edge_floor,
        }
    }

    /// Detect clusters in document order
    ///
    /// A window is hot when its mean reaches the threshold. Consecutive hot
    /// windows merge into one span from the first hot window's start to the
    /// last hot window's end; spans that overlap after a single cold window
    /// are merged as well. Sentences below the edge floor are then trimmed
    /// from both edges of each span, so a cluster never starts or ends on a
    /// narrative sentence that only rode along inside a hot window.
    pub fn detect(&self, densities: &[f64]) -> Vec<DensityCluster> {
        let window = self.window_size;
        if window == 0 || densities.len() < window {
            return Vec::new();
        }

        let mut spans: Vec<(usize, usize)> = Vec::new();
        let mut open: Option<usize> = None;

        for (i, slice) in densities.windows(window).enumerate() {
            let hot = stats::mean(slice) >= self.density_threshold;
            match (hot, open) {
                (true, None) => open = Some(i),
                (false, Some(start)) => {
                    // Window i - 1 was the last hot one
                    push_span(&mut spans, start, i - 1 + window - 1);
                    open = None;
                }
                _ => {}
            }
        }

        if let Some(start) = open {
            push_span(&mut spans, start, densities.len() - 1);
        }

        let clusters: Vec<DensityCluster> = spans
            .into_iter()
            .filter_map(|(start, end)| self.close(densities, start, end))
            .collect();

        tracing::debug!(clusters = clusters.len(), window, "cluster detection done");
        clusters
    }

    fn close(&self, densities: &[f64], start: usize, end: usize) -> Option<DensityCluster> {
        let mut start = start;
        let mut end = end;

        while start < end && densities[start] < self.edge_floor {
            start += 1;
        }
        while end > start && densities[end] < self.edge_floor {
            end -= 1;
        }

        let span = &densities[start..=end];
        if span.iter().all(|d| *d < self.edge_floor) {
            return None;
        }

        Some(DensityCluster {
            start,
            end,
            mean_density: stats::mean(span),
        })
    }
}

fn push_span(spans: &mut Vec<(usize, usize)>, start: usize, end: usize) {
    match spans.last_mut() {
        Some(last) if start <= last.1 => last.1 = last.1.max(end),
        _ => spans.push((start, end)),
    }
}
