//! Exclusion record model.

use crate::shared::{FacetTypeId, ModuleId};
use serde::{Deserialize, Serialize};

/// Persisted exclusion state, keyed by facet-type id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisabledAutodetectionInfo {
    #[serde(default)]
    pub elements: Vec<DisabledByTypeElement>,
}

/// Exclusions for one facet type.
///
/// An empty `modules` list means the type is disabled across the whole
/// project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisabledByTypeElement {
    pub facet_type_id: FacetTypeId,

    #[serde(default)]
    pub modules: Vec<DisabledInModuleElement>,
}

/// Module-scoped exclusion.
///
/// An empty `file_urls` list means the whole module is disabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisabledInModuleElement {
    pub module: ModuleId,

    #[serde(default)]
    pub file_urls: Vec<String>,
}

impl DisabledInModuleElement {
    pub fn whole_module(module: ModuleId) -> Self {
        Self {
            module,
            file_urls: Vec::new(),
        }
    }

    pub fn for_files(module: ModuleId, file_urls: Vec<String>) -> Self {
        Self { module, file_urls }
    }

    pub fn covers_whole_module(&self) -> bool {
        self.file_urls.is_empty()
    }
}

impl DisabledByTypeElement {
    pub fn whole_project(facet_type_id: FacetTypeId) -> Self {
        Self {
            facet_type_id,
            modules: Vec::new(),
        }
    }

    pub fn covers_whole_project(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn module_element(&self, module: &ModuleId) -> Option<&DisabledInModuleElement> {
        self.modules.iter().find(|m| &m.module == module)
    }

    /// Whether this element covers (module, url).
    pub fn is_disabled(&self, module: &ModuleId, url: &str) -> bool {
        if self.covers_whole_project() {
            return true;
        }
        match self.module_element(module) {
            Some(element) => {
                element.covers_whole_module() || element.file_urls.iter().any(|u| u == url)
            }
            None => false,
        }
    }

    /// Disable the type in a whole module. Widening only: a no-op if the
    /// whole project is already covered.
    pub fn add_disabled_module(&mut self, module: ModuleId) {
        if self.covers_whole_project() {
            return;
        }
        match self.modules.iter_mut().find(|m| m.module == module) {
            Some(element) => element.file_urls.clear(),
            None => self.modules.push(DisabledInModuleElement::whole_module(module)),
        }
    }

    /// Disable the type for specific files. A no-op where a broader rule
    /// already applies.
    pub fn add_disabled_files(&mut self, module: ModuleId, urls: &[String]) {
        if self.covers_whole_project() {
            return;
        }
        match self.modules.iter_mut().find(|m| m.module == module) {
            Some(element) => {
                if element.covers_whole_module() {
                    return;
                }
                for url in urls {
                    if !element.file_urls.contains(url) {
                        element.file_urls.push(url.clone());
                    }
                }
            }
            None => self
                .modules
                .push(DisabledInModuleElement::for_files(module, urls.to_vec())),
        }
    }
}

impl DisabledAutodetectionInfo {
    pub fn find_element(&self, facet_type: &FacetTypeId) -> Option<&DisabledByTypeElement> {
        self.elements.iter().find(|e| &e.facet_type_id == facet_type)
    }

    fn find_or_insert(&mut self, facet_type: &FacetTypeId) -> &mut DisabledByTypeElement {
        if let Some(pos) = self
            .elements
            .iter()
            .position(|e| &e.facet_type_id == facet_type)
        {
            return &mut self.elements[pos];
        }
        self.elements.push(DisabledByTypeElement {
            facet_type_id: facet_type.clone(),
            modules: Vec::new(),
        });
        self.elements.last_mut().unwrap()
    }

    /// Covered-by-any-matching-rule check.
    pub fn is_disabled(&self, facet_type: &FacetTypeId, module: &ModuleId, url: &str) -> bool {
        self.find_element(facet_type)
            .map(|e| e.is_disabled(module, url))
            .unwrap_or(false)
    }

    /// Disable a facet type across the whole project.
    pub fn add_disabled(&mut self, facet_type: &FacetTypeId) {
        let element = self.find_or_insert(facet_type);
        element.modules.clear();
    }

    /// Disable a facet type within one module.
    pub fn add_disabled_in_module(&mut self, facet_type: &FacetTypeId, module: ModuleId) {
        // An element freshly inserted here covers the whole project, which
        // is wider than asked; seed it with the module instead.
        if self.find_element(facet_type).is_none() {
            self.elements.push(DisabledByTypeElement {
                facet_type_id: facet_type.clone(),
                modules: vec![DisabledInModuleElement::whole_module(module)],
            });
            return;
        }
        self.find_or_insert(facet_type).add_disabled_module(module);
    }

    /// Disable a facet type for specific files within a module.
    pub fn add_disabled_in_files(
        &mut self,
        facet_type: &FacetTypeId,
        module: ModuleId,
        urls: &[String],
    ) {
        if self.find_element(facet_type).is_none() {
            self.elements.push(DisabledByTypeElement {
                facet_type_id: facet_type.clone(),
                modules: vec![DisabledInModuleElement::for_files(module, urls.to_vec())],
            });
            return;
        }
        self.find_or_insert(facet_type).add_disabled_files(module, urls);
    }

    /// Replace (or remove, with `None`) the element for a facet type.
    pub fn replace_element(
        &mut self,
        facet_type: &FacetTypeId,
        element: Option<DisabledByTypeElement>,
    ) {
        self.elements.retain(|e| &e.facet_type_id != facet_type);
        if let Some(element) = element {
            self.elements.push(element);
        }
    }
}
