//! Document-level orchestration of the extraction pipeline.
//!
//! Drives the per-page flow (prepare, segment, recognize, map) and the
//! per-document flow (merge, filter, store). Pages of a document are
//! independent: they run in parallel above a configurable count, a failed
//! page never takes down its document, and a failed document never takes
//! down a batch. Tags are committed per document in one atomic
//! replacement, so reprocessing supersedes earlier results instead of
//! accumulating next to them.

use std::sync::Arc;

use image::GrayImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::config::{ConfigValidatorExt, PipelineConfig};
use crate::core::errors::{PipelineError, PipelineResult, ProcessingStage};
use crate::core::traits::{OcrEngine, TagStore};
use crate::domain::detection::{Detection, DetectionSource};
use crate::domain::page::PageImage;
use crate::domain::region::RegionKind;
use crate::domain::tag::DocumentId;
use crate::pipeline::postprocess::TagFilterPipeline;
use crate::processors::coordinate::CoordinateMapper;
use crate::processors::merge::DetectionMerger;
use crate::processors::region_extract::RegionExtractor;
use crate::processors::spell::SpellDictionary;

/// Outcome counters for one processed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Pages that completed the per-page flow.
    pub pages_processed: usize,
    /// Pages that failed and were skipped.
    pub pages_failed: usize,
    /// Detections that survived the confidence gate, over all pages.
    pub detections: usize,
    /// Tags committed to the store.
    pub tags: usize,
    /// Whether any page was recognized whole because no region boundary
    /// was found.
    pub used_full_page_fallback: bool,
}

/// The end-to-end tag extraction pipeline for drawing documents.
pub struct DocumentPipeline<E, S> {
    engine: E,
    store: S,
    extractor: RegionExtractor,
    mapper: CoordinateMapper,
    merger: DetectionMerger,
    filters: TagFilterPipeline,
    config: PipelineConfig,
}

impl<E: OcrEngine, S: TagStore> DocumentPipeline<E, S> {
    /// Builds a pipeline from validated configuration and collaborators.
    pub fn new(
        config: PipelineConfig,
        engine: E,
        store: S,
        dictionary: Arc<SpellDictionary>,
    ) -> PipelineResult<Self> {
        let config = config.validate_and_wrap()?;
        let extractor = RegionExtractor::new(config.region)?;
        let mapper = CoordinateMapper::new(config.render_scale)?;
        let filters = TagFilterPipeline::new(config.spell, dictionary)?;
        Ok(Self {
            engine,
            store,
            extractor,
            mapper,
            merger: DetectionMerger::new(),
            filters,
            config,
        })
    }

    /// The validated configuration the pipeline runs with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The tag store the pipeline commits to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Processes one page raster into document-space detections.
    pub fn process_page(
        &self,
        page_index: usize,
        raster: GrayImage,
    ) -> PipelineResult<Vec<Detection>> {
        self.page_detections(page_index, raster)
            .map(|(detections, _)| detections)
    }

    /// Processes every page of a document and commits the resulting tags.
    ///
    /// Page failures are isolated; the document fails only when it has
    /// pages and every one of them failed. A document with no pages
    /// commits an empty tag set, superseding any earlier result.
    pub fn process_document(
        &self,
        document: DocumentId,
        pages: Vec<GrayImage>,
    ) -> PipelineResult<DocumentSummary> {
        let total_pages = pages.len();
        info!(document = %document, pages = total_pages, "processing document");

        let page_results: Vec<PipelineResult<(Vec<Detection>, bool)>> =
            if total_pages > self.config.page_threshold {
                use rayon::prelude::*;

                pages
                    .into_par_iter()
                    .enumerate()
                    .map(|(index, raster)| self.page_detections(index, raster))
                    .collect()
            } else {
                pages
                    .into_iter()
                    .enumerate()
                    .map(|(index, raster)| self.page_detections(index, raster))
                    .collect()
            };

        let mut pages_processed = 0;
        let mut pages_failed = 0;
        let mut used_full_page_fallback = false;
        let mut detection_count = 0;
        let mut groups = Vec::new();
        let mut last_error: Option<PipelineError> = None;
        for (index, result) in page_results.into_iter().enumerate() {
            match result {
                Ok((detections, used_fallback)) => {
                    pages_processed += 1;
                    used_full_page_fallback |= used_fallback;
                    detection_count += detections.len();
                    groups.extend(self.merger.merge(detections));
                }
                Err(e) => {
                    warn!(
                        document = %document,
                        page = index,
                        error = %e,
                        "page failed, continuing with remaining pages"
                    );
                    pages_failed += 1;
                    last_error = Some(e);
                }
            }
        }
        if total_pages > 0 && pages_processed == 0 {
            let source = last_error
                .unwrap_or_else(|| PipelineError::invalid_input("no pages processed"));
            return Err(PipelineError::processing_error(
                ProcessingStage::PageProcessing,
                &format!("all {total_pages} pages of document {document} failed"),
                source,
            ));
        }

        let groups = self.filters.apply(groups);
        let tag_count = groups.len();
        self.store.replace_document_tags(document, groups)?;
        info!(
            document = %document,
            pages = pages_processed,
            failed = pages_failed,
            detections = detection_count,
            tags = tag_count,
            "document committed"
        );
        Ok(DocumentSummary {
            pages_processed,
            pages_failed,
            detections: detection_count,
            tags: tag_count,
            used_full_page_fallback,
        })
    }

    /// Processes documents independently; one failure never aborts the
    /// rest.
    pub fn process_batch(
        &self,
        documents: Vec<(DocumentId, Vec<GrayImage>)>,
    ) -> Vec<(DocumentId, PipelineResult<DocumentSummary>)> {
        documents
            .into_iter()
            .map(|(document, pages)| {
                let result = self.process_document(document, pages);
                if let Err(e) = &result {
                    warn!(document = %document, error = %e, "document failed");
                }
                (document, result)
            })
            .collect()
    }

    /// Runs the per-page flow, returning detections and whether the page
    /// fell back to whole-page recognition.
    fn page_detections(
        &self,
        page_index: usize,
        raster: GrayImage,
    ) -> PipelineResult<(Vec<Detection>, bool)> {
        let page = PageImage::from_raster(raster)?.padded_to_multiple_of(self.config.pad_stride);
        let extraction = self.extractor.extract(&page);

        if extraction.needs_full_page_fallback() {
            warn!(
                page = page_index,
                boundary = ?extraction.boundary,
                "no region crop available, recognizing whole page"
            );
            let detections =
                self.recognize_region(page.raster(), (0, 0), page_index, DetectionSource::FullPage);
            return Ok((detections, true));
        }

        let mut detections = Vec::new();
        for region in extraction.regions() {
            let source = match region.kind {
                RegionKind::Figure => DetectionSource::Figure,
                RegionKind::Table => DetectionSource::Table,
            };
            detections.extend(self.recognize_region(&region.crop, region.offset, page_index, source));
        }
        Ok((detections, false))
    }

    /// Recognizes one crop and maps the kept lines into document space.
    ///
    /// A recognition error downgrades to zero detections; an unreadable
    /// crop must not fail the page.
    fn recognize_region(
        &self,
        raster: &GrayImage,
        offset: (u32, u32),
        page_index: usize,
        source: DetectionSource,
    ) -> Vec<Detection> {
        let raw = match self.engine.recognize(raster) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    page = page_index,
                    source = source.name(),
                    error = %e,
                    "recognition failed, treating as zero detections"
                );
                return Vec::new();
            }
        };
        let total = raw.len();
        let detections: Vec<Detection> = raw
            .into_iter()
            .filter(|r| r.confidence >= self.config.min_confidence)
            .map(|r| Detection {
                polygon: self.mapper.to_document_space(&r.polygon, offset),
                text: r.text,
                confidence: r.confidence,
                page_index,
                source,
            })
            .collect();
        debug!(
            page = page_index,
            source = source.name(),
            raw = total,
            kept = detections.len(),
            "recognized region"
        );
        detections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::RawDetection;
    use crate::processors::geometry::Polygon;
    use crate::storage::InMemoryTagStore;

    /// Returns the same scripted lines for every crop it is shown.
    struct ScriptedEngine {
        lines: Vec<RawDetection>,
    }

    impl OcrEngine for ScriptedEngine {
        fn recognize(&self, _raster: &GrayImage) -> PipelineResult<Vec<RawDetection>> {
            Ok(self.lines.clone())
        }
    }

    struct FailingEngine;

    impl OcrEngine for FailingEngine {
        fn recognize(&self, _raster: &GrayImage) -> PipelineResult<Vec<RawDetection>> {
            Err(PipelineError::recognition_error(std::io::Error::other(
                "model unavailable",
            )))
        }
    }

    fn raw(x1: f32, y1: f32, x2: f32, y2: f32, text: &str, confidence: f32) -> RawDetection {
        RawDetection {
            polygon: Polygon::from_coords(x1, y1, x2, y2),
            text: text.to_string(),
            confidence,
        }
    }

    fn dictionary() -> Arc<SpellDictionary> {
        Arc::new(SpellDictionary::from_terms([("VALVE", 100u64)]))
    }

    fn scripted_pipeline(
        lines: Vec<RawDetection>,
    ) -> DocumentPipeline<ScriptedEngine, InMemoryTagStore> {
        DocumentPipeline::new(
            PipelineConfig::default(),
            ScriptedEngine { lines },
            InMemoryTagStore::new(),
            dictionary(),
        )
        .unwrap()
    }

    #[test]
    fn test_document_flow_end_to_end() {
        // Blank pages have no boundary, so the scripted engine sees the
        // whole page once per page.
        let pipeline = scripted_pipeline(vec![
            raw(100.0, 100.0, 160.0, 120.0, "P-101A", 0.95),
            raw(300.0, 50.0, 308.0, 60.0, "5", 0.9),
            raw(100.0, 130.0, 160.0, 150.0, "VLAVE", 0.8),
            raw(100.0, 150.0, 160.0, 170.0, "101", 0.8),
            raw(10.0, 10.0, 20.0, 20.0, "NOISE", 0.3),
        ]);
        let document = DocumentId(7);
        let summary = pipeline
            .process_document(document, vec![GrayImage::new(400, 300)])
            .unwrap();

        assert_eq!(summary.pages_processed, 1);
        assert_eq!(summary.pages_failed, 0);
        // NOISE falls to the confidence gate; the other four survive.
        assert_eq!(summary.detections, 4);
        // P-101A alone, VLAVE+101 merged, the bare 5 filtered out.
        assert_eq!(summary.tags, 2);
        assert!(summary.used_full_page_fallback);

        let stored = pipeline.store().tags_for(document);
        let mut texts: Vec<&str> = stored.iter().map(|g| g.tag.text.as_str()).collect();
        texts.sort_unstable();
        assert_eq!(texts, vec!["P-101A", "VALVE 101"]);

        let equipment = stored.iter().find(|g| g.tag.text == "P-101A").unwrap();
        assert!(equipment.tag.equipment_tag);
        // Detection coordinates were divided by the render scale.
        let rect = &equipment.tag.bbox;
        assert_eq!((rect.x_min, rect.y_min), (25.0, 25.0));
        assert_eq!((rect.x_max, rect.y_max), (40.0, 30.0));
    }

    #[test]
    fn test_reprocessing_replaces_tags() {
        let pipeline = scripted_pipeline(vec![raw(0.0, 0.0, 50.0, 10.0, "VALVE", 0.9)]);
        let document = DocumentId(1);
        pipeline
            .process_document(document, vec![GrayImage::new(400, 300)])
            .unwrap();
        pipeline
            .process_document(document, vec![GrayImage::new(400, 300)])
            .unwrap();
        assert_eq!(pipeline.store().tags_for(document).len(), 1);
    }

    #[test]
    fn test_empty_document_supersedes_earlier_tags() {
        let pipeline = scripted_pipeline(vec![raw(0.0, 0.0, 50.0, 10.0, "VALVE", 0.9)]);
        let document = DocumentId(2);
        pipeline
            .process_document(document, vec![GrayImage::new(400, 300)])
            .unwrap();
        assert_eq!(pipeline.store().tags_for(document).len(), 1);

        let summary = pipeline.process_document(document, Vec::new()).unwrap();
        assert_eq!(summary.pages_processed, 0);
        assert_eq!(summary.tags, 0);
        assert!(pipeline.store().tags_for(document).is_empty());
    }

    #[test]
    fn test_failed_page_is_isolated() {
        let pipeline = scripted_pipeline(vec![raw(0.0, 0.0, 50.0, 10.0, "VALVE", 0.9)]);
        let document = DocumentId(3);
        let summary = pipeline
            .process_document(
                document,
                vec![GrayImage::new(0, 0), GrayImage::new(400, 300)],
            )
            .unwrap();
        assert_eq!(summary.pages_failed, 1);
        assert_eq!(summary.pages_processed, 1);
        assert_eq!(pipeline.store().tags_for(document).len(), 1);
    }

    #[test]
    fn test_document_fails_when_every_page_fails() {
        let pipeline = scripted_pipeline(Vec::new());
        let document = DocumentId(4);
        let result =
            pipeline.process_document(document, vec![GrayImage::new(0, 0), GrayImage::new(0, 0)]);
        assert!(result.is_err());
        assert!(pipeline.store().tags_for(document).is_empty());
    }

    #[test]
    fn test_batch_isolates_document_failures() {
        let pipeline = scripted_pipeline(vec![raw(0.0, 0.0, 50.0, 10.0, "VALVE", 0.9)]);
        let results = pipeline.process_batch(vec![
            (DocumentId(10), vec![GrayImage::new(0, 0)]),
            (DocumentId(11), vec![GrayImage::new(400, 300)]),
        ]);
        assert_eq!(results.len(), 2);
        assert!(results[0].1.is_err());
        assert!(results[1].1.is_ok());
        assert_eq!(pipeline.store().tags_for(DocumentId(11)).len(), 1);
    }

    #[test]
    fn test_multi_page_document_runs_parallel_path() {
        // Three pages with the default threshold of one exercises the
        // parallel branch; results must match the sequential semantics.
        let pipeline = scripted_pipeline(vec![raw(0.0, 0.0, 50.0, 10.0, "VALVE", 0.9)]);
        let document = DocumentId(5);
        let summary = pipeline
            .process_document(
                document,
                vec![
                    GrayImage::new(400, 300),
                    GrayImage::new(400, 300),
                    GrayImage::new(400, 300),
                ],
            )
            .unwrap();
        assert_eq!(summary.pages_processed, 3);
        assert_eq!(summary.detections, 3);
        assert_eq!(summary.tags, 3);
    }

    #[test]
    fn test_recognition_error_downgrades_to_zero_detections() {
        let pipeline = DocumentPipeline::new(
            PipelineConfig::default(),
            FailingEngine,
            InMemoryTagStore::new(),
            dictionary(),
        )
        .unwrap();
        let document = DocumentId(6);
        let summary = pipeline
            .process_document(document, vec![GrayImage::new(400, 300)])
            .unwrap();
        assert_eq!(summary.pages_processed, 1);
        assert_eq!(summary.detections, 0);
        assert_eq!(summary.tags, 0);
    }

    #[test]
    fn test_process_page_maps_to_document_space() {
        let pipeline = scripted_pipeline(vec![raw(40.0, 80.0, 80.0, 120.0, "VALVE", 0.9)]);
        let detections = pipeline.process_page(0, GrayImage::new(400, 300)).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].source, DetectionSource::FullPage);
        let rect = detections[0].bounding_rect().unwrap();
        assert_eq!((rect.x_min, rect.y_min), (10.0, 20.0));
    }
}
