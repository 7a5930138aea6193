//! Shared host doubles for integration tests.

#![allow(dead_code)]

use facetect::{
    AdditionPolicy, DetectedFacet, DetectionError, DetectorRegistrar, FacetInstance, FacetType,
    FacetTypeId, FileHandle, FileTypeId, FileUrl, ImplicitFacetListener, ModuleId, ModuleModel,
    ProjectFileIndex, Result,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// In-memory file with a bump-on-edit modification stamp.
pub struct TestFile {
    url: FileUrl,
    file_type: FileTypeId,
    valid: AtomicBool,
    stamp: AtomicU64,
    content: Mutex<String>,
}

impl TestFile {
    pub fn new(url: &str, file_type: &str, content: &str) -> Arc<Self> {
        Arc::new(Self {
            url: FileUrl::new(url),
            file_type: FileTypeId::new(file_type),
            valid: AtomicBool::new(true),
            stamp: AtomicU64::new(1),
            content: Mutex::new(content.to_string()),
        })
    }

    pub fn set_content(&self, content: &str) {
        *self.content.lock() = content.to_string();
        self.stamp.fetch_add(1, Ordering::SeqCst);
    }

    pub fn invalidate(&self) {
        self.valid.store(false, Ordering::SeqCst);
    }
}

impl FileHandle for TestFile {
    fn is_valid(&self) -> bool {
        self.valid.load(Ordering::SeqCst)
    }

    fn is_directory(&self) -> bool {
        false
    }

    fn url(&self) -> FileUrl {
        self.url.clone()
    }

    fn modification_stamp(&self) -> u64 {
        self.stamp.load(Ordering::SeqCst)
    }

    fn file_type(&self) -> FileTypeId {
        self.file_type.clone()
    }

    fn content_text(&self) -> Result<String> {
        Ok(self.content.lock().clone())
    }
}

pub fn as_handle(file: &Arc<TestFile>) -> Arc<dyn FileHandle> {
    Arc::clone(file) as Arc<dyn FileHandle>
}

/// Module = first path segment: "file://app/web.xml" lives in "app".
pub fn module_of_url(url: &FileUrl) -> Option<ModuleId> {
    let rest = url.as_str().strip_prefix("file://")?;
    rest.split('/').next().map(ModuleId::new)
}

pub struct PrefixModuleModel;

impl ModuleModel for PrefixModuleModel {
    fn module_for(&self, url: &FileUrl) -> Option<ModuleId> {
        module_of_url(url)
    }
}

#[derive(Default)]
pub struct StaticFileIndex {
    files: RwLock<Vec<Arc<TestFile>>>,
}

impl StaticFileIndex {
    pub fn add(&self, file: Arc<TestFile>) {
        self.files.write().push(file);
    }
}

impl ProjectFileIndex for StaticFileIndex {
    fn files_of_types(&self, types: &HashSet<FileTypeId>) -> Vec<Arc<dyn FileHandle>> {
        self.files
            .read()
            .iter()
            .filter(|f| f.is_valid() && types.contains(&f.file_type()))
            .map(as_handle)
            .collect()
    }

    fn find_file(&self, url: &FileUrl) -> Option<Arc<dyn FileHandle>> {
        self.files
            .read()
            .iter()
            .find(|f| &f.url() == url)
            .map(as_handle)
    }
}

pub struct AllowAll;

impl AdditionPolicy for AllowAll {
    fn is_addition_enabled(&self, _facet_type: &FacetTypeId, _strict: bool) -> bool {
        true
    }
}

#[derive(Default)]
pub struct RecordingListener {
    accepted: Mutex<Vec<FacetInstance>>,
}

impl RecordingListener {
    pub fn accepted(&self) -> Vec<FacetInstance> {
        self.accepted.lock().clone()
    }
}

/// Newtype so the foreign `ImplicitFacetListener` trait can be implemented
/// for a shared `RecordingListener` without violating the orphan rule.
pub struct SharedListener(pub Arc<RecordingListener>);

impl ImplicitFacetListener for SharedListener {
    fn implicit_facet_accepted(&self, facet: &FacetInstance) {
        self.0.accepted.lock().push(facet.clone());
    }
}

/// Detects a facet when the file name matches a suffix and the content
/// contains a marker string. Counts detector invocations.
pub struct MarkerFacetType {
    id: FacetTypeId,
    file_type: FileTypeId,
    suffix: String,
    marker: String,
    facet_name: String,
    pub invocations: Arc<AtomicUsize>,
}

impl MarkerFacetType {
    pub fn new(id: &str, file_type: &str, suffix: &str, marker: &str, facet_name: &str) -> Arc<Self> {
        Arc::new(Self {
            id: FacetTypeId::new(id),
            file_type: FileTypeId::new(file_type),
            suffix: suffix.to_string(),
            marker: marker.to_string(),
            facet_name: facet_name.to_string(),
            invocations: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn runs(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

impl FacetType for MarkerFacetType {
    fn id(&self) -> FacetTypeId {
        self.id.clone()
    }

    fn register_detectors(&self, registrar: &mut DetectorRegistrar<'_>) {
        let suffix = self.suffix.clone();
        let marker = self.marker.clone();
        let facet_name = self.facet_name.clone();
        let id = self.id.clone();
        let invocations = Arc::clone(&self.invocations);

        registrar.register(
            self.file_type.clone(),
            Arc::new(move |file: &dyn FileHandle| file.url().as_str().ends_with(&suffix)),
            Arc::new(move |file: &dyn FileHandle| -> Result<Option<DetectedFacet>> {
                invocations.fetch_add(1, Ordering::SeqCst);
                let content = file.content_text()?;
                if !content.contains(&marker) {
                    return Ok(None);
                }
                let module = module_of_url(&file.url())
                    .ok_or_else(|| DetectionError::detector("file outside any module"))?;
                Ok(Some(DetectedFacet::new(
                    id.clone(),
                    module,
                    facet_name.clone(),
                    serde_json::json!({ "source": file.url().as_str() }),
                )))
            }),
        );
    }
}
