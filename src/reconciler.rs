//! Reconciliation of a parsed document against a region spec tree
//!
//! The reconciler walks spec and parsed tree together, by region name, one
//! level at a time: missing regions are synthesized when required (or when
//! a template forces them into existence), generated content is refreshed
//! from templates, hand-edited content is left untouched, and regions the
//! spec does not know about are kept in place and reported.

use std::collections::HashSet;

use tracing::debug;

use crate::error::MergeError;
use crate::models::{Document, DocumentItem, MarkerSyntax, Region, RegionSpec, RenderContext};
use crate::renderer::TemplateRenderer;

/// Outcome of reconciling one document
#[derive(Debug)]
pub struct Reconciled {
    /// The merged document tree
    pub document: Document,
    /// Slash-joined paths of required regions synthesized during the walk
    pub added_regions: Vec<String>,
    /// Slash-joined paths of input regions with no spec entry
    pub unknown_regions: Vec<String>,
}

/// Walks a spec tree against a parsed document
///
/// Holds only the renderer and marker syntax; diagnostic lists are built
/// fresh inside every [`Reconciler::reconcile`] call, so a single instance
/// is safe to reuse across artifacts.
pub struct Reconciler<'a, R: TemplateRenderer> {
    renderer: &'a R,
    syntax: &'a MarkerSyntax,
}

impl<'a, R: TemplateRenderer> Reconciler<'a, R> {
    /// Create a reconciler over a renderer and marker syntax
    pub fn new(renderer: &'a R, syntax: &'a MarkerSyntax) -> Self {
        Self { renderer, syntax }
    }

    /// Reconcile a parsed document against sibling specs
    ///
    /// Either returns the complete merged tree with its diagnostics, or an
    /// error; there is no partial merge.
    pub fn reconcile(
        &self,
        mut document: Document,
        specs: &[RegionSpec],
        context: &RenderContext,
    ) -> Result<Reconciled, MergeError> {
        let mut added = Vec::new();
        let mut unknown = Vec::new();
        self.reconcile_root(&mut document.items, specs, context, "", &mut added, &mut unknown)?;
        verify_required_root(&document.items, specs, "")?;
        debug!(
            "Reconciled {} spec regions: {} added, {} unknown",
            specs.len(),
            added.len(),
            unknown.len()
        );
        Ok(Reconciled {
            document,
            added_regions: added,
            unknown_regions: unknown,
        })
    }

    fn reconcile_root(
        &self,
        items: &mut Vec<DocumentItem>,
        specs: &[RegionSpec],
        context: &RenderContext,
        path: &str,
        added: &mut Vec<String>,
        unknown: &mut Vec<String>,
    ) -> Result<(), MergeError> {
        for spec in specs {
            let position = items
                .iter()
                .position(|item| matches!(item, DocumentItem::Region(r) if r.name == spec.name));
            if let Some(idx) = position {
                let region_path = join_path(path, &spec.name);
                if let DocumentItem::Region(region) = &mut items[idx] {
                    self.reconcile_children(
                        &mut region.children,
                        &spec.children,
                        context,
                        &region_path,
                        added,
                        unknown,
                    )?;
                    self.populate(region, spec, context, &region_path)?;
                }
            } else if should_synthesize(spec) {
                let region = self.synthesize(spec, context, path, added, unknown)?;
                let at = root_insertion_index(items, specs, &spec.name);
                items.insert(at, DocumentItem::Region(region));
            }
        }

        let spec_names: HashSet<&str> = specs.iter().map(|s| s.name.as_str()).collect();
        for item in items.iter() {
            if let DocumentItem::Region(region) = item {
                if !spec_names.contains(region.name.as_str()) {
                    unknown.push(join_path(path, &region.name));
                }
            }
        }
        Ok(())
    }

    fn reconcile_children(
        &self,
        children: &mut Vec<Region>,
        specs: &[RegionSpec],
        context: &RenderContext,
        path: &str,
        added: &mut Vec<String>,
        unknown: &mut Vec<String>,
    ) -> Result<(), MergeError> {
        for spec in specs {
            let position = children.iter().position(|c| c.name == spec.name);
            if let Some(idx) = position {
                let region_path = join_path(path, &spec.name);
                let region = &mut children[idx];
                self.reconcile_children(
                    &mut region.children,
                    &spec.children,
                    context,
                    &region_path,
                    added,
                    unknown,
                )?;
                self.populate(region, spec, context, &region_path)?;
            } else if should_synthesize(spec) {
                let region = self.synthesize(spec, context, path, added, unknown)?;
                let at = child_insertion_index(children, specs, &spec.name);
                children.insert(at, region);
            }
        }

        let spec_names: HashSet<&str> = specs.iter().map(|s| s.name.as_str()).collect();
        for child in children.iter() {
            if !spec_names.contains(child.name.as_str()) {
                unknown.push(join_path(path, &child.name));
            }
        }
        Ok(())
    }

    /// Build a missing region with canonical markers, then reconcile its
    /// children and populate its slots like any other region. Only required
    /// regions are recorded as added; an optional region synthesized because
    /// a template forces it into existence is not.
    fn synthesize(
        &self,
        spec: &RegionSpec,
        context: &RenderContext,
        parent_path: &str,
        added: &mut Vec<String>,
        unknown: &mut Vec<String>,
    ) -> Result<Region, MergeError> {
        let region_path = join_path(parent_path, &spec.name);
        let mut region = Region::synthesized(&spec.name, self.syntax, spec.indentation_level);
        if !spec.optional {
            added.push(region_path.clone());
        }
        self.reconcile_children(
            &mut region.children,
            &spec.children,
            context,
            &region_path,
            added,
            unknown,
        )?;
        self.populate(&mut region, spec, context, &region_path)?;
        Ok(region)
    }

    /// Apply the content population rule to head and tail independently:
    /// a templated slot is regenerated when the region is not editable or
    /// the slot holds nothing but whitespace; editable, non-blank content
    /// is never overwritten. Optionality plays no part here.
    fn populate(
        &self,
        region: &mut Region,
        spec: &RegionSpec,
        context: &RenderContext,
        path: &str,
    ) -> Result<(), MergeError> {
        if let Some(template) = &spec.head_template {
            if !spec.editable || region.head_content.trim().is_empty() {
                region.head_content = self.render(template, context, path)?;
            }
        }
        if let Some(template) = &spec.tail_template {
            if !spec.editable || region.tail_content.trim().is_empty() {
                region.tail_content = self.render(template, context, path)?;
            }
        }
        Ok(())
    }

    fn render(
        &self,
        template: &str,
        context: &RenderContext,
        region: &str,
    ) -> Result<String, MergeError> {
        self.renderer
            .render(template, context)
            .map_err(|source| MergeError::Render {
                template: template.to_string(),
                region: region.to_string(),
                source,
            })
    }
}

// Optionality governs creation only when no template forces the region to
// exist; content refresh is governed separately by populate().
fn should_synthesize(spec: &RegionSpec) -> bool {
    !spec.optional || spec.has_template()
}

/// Spec names that follow `name` in spec order; a synthesized region is
/// inserted immediately before the first of these already present, so
/// existing regions and pass-through text never move.
fn following_names<'s>(specs: &'s [RegionSpec], name: &str) -> HashSet<&'s str> {
    specs
        .iter()
        .skip_while(|s| s.name != name)
        .skip(1)
        .map(|s| s.name.as_str())
        .collect()
}

fn root_insertion_index(items: &[DocumentItem], specs: &[RegionSpec], name: &str) -> usize {
    let following = following_names(specs, name);
    items
        .iter()
        .position(|item| matches!(item, DocumentItem::Region(r) if following.contains(r.name.as_str())))
        .unwrap_or(items.len())
}

fn child_insertion_index(children: &[Region], specs: &[RegionSpec], name: &str) -> usize {
    let following = following_names(specs, name);
    children
        .iter()
        .position(|c| following.contains(c.name.as_str()))
        .unwrap_or(children.len())
}

// Post-condition walk: every required spec region must exist in the merged
// tree. Synthesis should make this unreachable; failing loudly here beats
// emitting an invalid artifact.
fn verify_required_root(
    items: &[DocumentItem],
    specs: &[RegionSpec],
    path: &str,
) -> Result<(), MergeError> {
    for spec in specs {
        let found = items.iter().find_map(|item| match item {
            DocumentItem::Region(region) if region.name == spec.name => Some(region),
            _ => None,
        });
        verify_spec(found, spec, path)?;
    }
    Ok(())
}

fn verify_required_children(
    children: &[Region],
    specs: &[RegionSpec],
    path: &str,
) -> Result<(), MergeError> {
    for spec in specs {
        let found = children.iter().find(|c| c.name == spec.name);
        verify_spec(found, spec, path)?;
    }
    Ok(())
}

fn verify_spec(found: Option<&Region>, spec: &RegionSpec, path: &str) -> Result<(), MergeError> {
    match found {
        Some(region) => {
            verify_required_children(&region.children, &spec.children, &join_path(path, &spec.name))
        }
        None if !spec.optional => Err(MergeError::SectionUnresolvable {
            name: join_path(path, &spec.name),
        }),
        None => Ok(()),
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}
