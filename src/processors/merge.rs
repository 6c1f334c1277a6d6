//! Merging detections into tags by bounding-box connectivity.
//!
//! Multi-line labels are recognized as separate detections stacked
//! vertically. Two detections belong to the same tag when their
//! axis-aligned bounding rectangles overlap on both axes, edges touching
//! included, and overlap chains transitively: merging operates on
//! connected components of the adjacency graph, not on pairwise overlap
//! alone.

use std::cmp::Ordering;
use std::collections::VecDeque;

use itertools::Itertools;
use tracing::debug;

use crate::domain::detection::Detection;
use crate::domain::tag::{Tag, TagGroup};
use crate::processors::geometry::Rect;

/// Adjacency lists over one page's detections, keyed by detection index.
#[derive(Debug)]
pub struct AdjacencyGraph {
    neighbors: Vec<Vec<usize>>,
}

impl AdjacencyGraph {
    /// Builds the graph by testing every pair of rectangles for inclusive
    /// overlap.
    pub fn build(rects: &[Rect]) -> Self {
        let mut neighbors = vec![Vec::new(); rects.len()];
        for i in 0..rects.len() {
            for j in (i + 1)..rects.len() {
                if rects[i].overlaps(&rects[j]) {
                    neighbors[i].push(j);
                    neighbors[j].push(i);
                }
            }
        }
        Self { neighbors }
    }

    /// Number of vertices in the graph.
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Whether the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Neighbors of a vertex.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        &self.neighbors[index]
    }

    /// Finds connected components by breadth-first traversal.
    ///
    /// The components partition the vertex set: every index appears in
    /// exactly one component.
    pub fn connected_components(&self) -> Vec<Vec<usize>> {
        let mut visited = vec![false; self.neighbors.len()];
        let mut components = Vec::new();
        for start in 0..self.neighbors.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            let mut component = vec![start];
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                for &next in &self.neighbors[current] {
                    if !visited[next] {
                        visited[next] = true;
                        component.push(next);
                        queue.push_back(next);
                    }
                }
            }
            components.push(component);
        }
        components
    }
}

/// Groups one page's detections into tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectionMerger;

impl DetectionMerger {
    /// Creates a merger.
    pub fn new() -> Self {
        Self
    }

    /// Partitions `detections` into tag groups.
    ///
    /// Every detection lands in exactly one group. Members are ordered
    /// top-to-bottom by the minimum y of their bounding rectangle, ties
    /// keeping input order, and the tag text joins member texts with
    /// single spaces in that order. The tag confidence is the minimum over
    /// the members.
    pub fn merge(&self, detections: Vec<Detection>) -> Vec<TagGroup> {
        if detections.is_empty() {
            return Vec::new();
        }
        let rects: Vec<Rect> = detections
            .iter()
            .map(|d| {
                d.bounding_rect()
                    .unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0))
            })
            .collect();
        let graph = AdjacencyGraph::build(&rects);
        let components = graph.connected_components();
        debug!(
            detections = detections.len(),
            tags = components.len(),
            "merged detections into tags"
        );

        let mut slots: Vec<Option<Detection>> = detections.into_iter().map(Some).collect();
        components
            .into_iter()
            .map(|component| build_group(component, &rects, &mut slots))
            .collect()
    }
}

fn build_group(
    mut component: Vec<usize>,
    rects: &[Rect],
    slots: &mut [Option<Detection>],
) -> TagGroup {
    component.sort_by(|&a, &b| {
        rects[a]
            .y_min
            .partial_cmp(&rects[b].y_min)
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    let expected = component.len();
    let members: Vec<Detection> = component
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect();
    // Components partition the index set, so every slot is taken once.
    debug_assert_eq!(members.len(), expected);

    let text = members.iter().map(|d| d.text.as_str()).join(" ");
    let bbox = members
        .iter()
        .filter_map(Detection::bounding_rect)
        .reduce(|a, b| a.union(&b))
        .unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));
    let confidence = members
        .iter()
        .map(|d| d.confidence)
        .reduce(f32::min)
        .unwrap_or(0.0);
    TagGroup {
        tag: Tag {
            text,
            bbox,
            confidence,
            // Resolved by the filter pipeline once the text is final.
            equipment_tag: false,
        },
        members,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::detection::DetectionSource;
    use crate::processors::geometry::Polygon;

    fn det(x1: f32, y1: f32, x2: f32, y2: f32, text: &str, confidence: f32) -> Detection {
        Detection {
            polygon: Polygon::from_coords(x1, y1, x2, y2),
            text: text.to_string(),
            confidence,
            page_index: 0,
            source: DetectionSource::Figure,
        }
    }

    #[test]
    fn test_merge_of_no_detections_is_empty() {
        assert!(DetectionMerger::new().merge(Vec::new()).is_empty());
    }

    #[test]
    fn test_overlapping_detections_form_one_tag() {
        let groups = DetectionMerger::new().merge(vec![
            det(0.0, 0.0, 10.0, 10.0, "A", 0.9),
            det(5.0, 5.0, 20.0, 20.0, "B", 0.8),
            det(30.0, 30.0, 40.0, 40.0, "C", 0.7),
        ]);
        assert_eq!(groups.len(), 2);
        let total: usize = groups.iter().map(|g| g.members.len()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_overlap_chains_transitively() {
        // A overlaps B and B overlaps C, but A and C are disjoint.
        let groups = DetectionMerger::new().merge(vec![
            det(0.0, 0.0, 10.0, 10.0, "A", 0.9),
            det(8.0, 0.0, 18.0, 10.0, "B", 0.9),
            det(16.0, 0.0, 26.0, 10.0, "C", 0.9),
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].tag.text, "A B C");
    }

    #[test]
    fn test_touching_edges_count_as_overlap() {
        let groups = DetectionMerger::new().merge(vec![
            det(0.0, 0.0, 10.0, 10.0, "A", 0.9),
            det(10.0, 0.0, 20.0, 10.0, "B", 0.9),
        ]);
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn test_members_order_top_to_bottom() {
        let groups = DetectionMerger::new().merge(vec![
            det(0.0, 12.0, 30.0, 20.0, "101A", 0.8),
            det(0.0, 0.0, 30.0, 12.0, "PUMP", 0.9),
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].tag.text, "PUMP 101A");
        assert_eq!(groups[0].members[0].text, "PUMP");
    }

    #[test]
    fn test_equal_tops_keep_input_order() {
        let groups = DetectionMerger::new().merge(vec![
            det(0.0, 0.0, 10.0, 10.0, "LEFT", 0.9),
            det(9.0, 0.0, 20.0, 10.0, "RIGHT", 0.9),
        ]);
        assert_eq!(groups[0].tag.text, "LEFT RIGHT");
    }

    #[test]
    fn test_tag_spans_members_and_takes_min_confidence() {
        let groups = DetectionMerger::new().merge(vec![
            det(2.0, 0.0, 10.0, 10.0, "A", 0.9),
            det(0.0, 8.0, 12.0, 22.0, "B", 0.6),
        ]);
        let tag = &groups[0].tag;
        assert_eq!(
            (tag.bbox.x_min, tag.bbox.y_min, tag.bbox.x_max, tag.bbox.y_max),
            (0.0, 0.0, 12.0, 22.0)
        );
        assert_eq!(tag.confidence, 0.6);
    }

    #[test]
    fn test_merge_is_deterministic() {
        let input = vec![
            det(0.0, 0.0, 10.0, 10.0, "A", 0.9),
            det(5.0, 5.0, 20.0, 20.0, "B", 0.8),
            det(30.0, 0.0, 40.0, 10.0, "C", 0.7),
        ];
        let first = DetectionMerger::new().merge(input.clone());
        let second = DetectionMerger::new().merge(input);
        assert_eq!(first, second);
    }

    #[test]
    fn test_adjacency_graph_structure() {
        let rects = vec![
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(8.0, 0.0, 18.0, 10.0),
            Rect::new(16.0, 0.0, 26.0, 10.0),
            Rect::new(50.0, 50.0, 60.0, 60.0),
        ];
        let graph = AdjacencyGraph::build(&rects);
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.neighbors(1), &[0, 2]);
        assert_eq!(graph.neighbors(3), &[] as &[usize]);

        let components = graph.connected_components();
        assert_eq!(components, vec![vec![0, 1, 2], vec![3]]);
    }
}
