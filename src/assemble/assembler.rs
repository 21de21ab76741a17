//! Composition of assembly descriptors into a single source blob.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::diagnostics::{Diagnostic, DiagnosticsSink};
use crate::resolve::ResolvedMeta;

use super::translations::{load_table, merge_tables};

/// Conversion of an HTML template into injectable source text.
///
/// The conversion algorithm is an external collaborator; the assembler only
/// consumes its output.
pub trait TemplateConverter: Send + Sync {
  /// Convert template markup, told whether a translation table was injected
  /// ahead of it.
  fn convert(&self, html: &str, has_translations: bool) -> Result<String>;
}

/// Converter returning the template text unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughConverter;

impl TemplateConverter for PassthroughConverter {
  fn convert(&self, html: &str, _has_translations: bool) -> Result<String> {
    Ok(html.to_string())
  }
}

/// Ordered fragment list read from an `assembly.json` descriptor.
#[derive(Debug, Deserialize)]
pub struct AssemblyDescriptor {
  /// Relative fragment paths within the module directory. Order is
  /// preserved verbatim in the composed output.
  pub files: Vec<String>,
}

/// Composes assembly descriptors into one deterministic, traceable blob.
///
/// Each appended piece is wrapped in an `Included File` marker comment so
/// the synthetic artifact stays debuggable.
pub struct ModuleAssembler<'a> {
  converter: &'a dyn TemplateConverter,
  diagnostics: &'a dyn DiagnosticsSink,
}

impl<'a> ModuleAssembler<'a> {
  /// Create an assembler reporting failures to `diagnostics`.
  pub fn new(converter: &'a dyn TemplateConverter, diagnostics: &'a dyn DiagnosticsSink) -> Self {
    Self {
      converter,
      diagnostics,
    }
  }

  /// Compose the assembly described by `meta`.
  ///
  /// Never fails outward: a broken assembly degrades to a single-line
  /// comment describing the error, reported through the diagnostics sink,
  /// so one bad module cannot abort an entire build run.
  pub fn assemble(&self, meta: &ResolvedMeta) -> String {
    match self.compose(meta) {
      Ok(contents) => contents,
      Err(err) => {
        let assembly = meta.main_file.display().to_string();
        let message = format!("{err:#}");
        self.diagnostics.report(Diagnostic::AssemblyBuild {
          assembly: assembly.clone(),
          message: message.clone(),
        });
        format!("//Error building assembly '{assembly}': {message}")
      }
    }
  }

  fn compose(&self, meta: &ResolvedMeta) -> Result<String> {
    let descriptor_text = fs::read_to_string(&meta.main_file)
      .with_context(|| format!("failed to read {}", meta.main_file.display()))?;
    let descriptor: AssemblyDescriptor =
      serde_json::from_str(&descriptor_text).context("failed to parse assembly descriptor")?;

    let module_dir = meta
      .base_module_path
      .as_deref()
      .ok_or_else(|| anyhow!("assembly metadata is missing its module directory"))?;
    let base_path = meta
      .base_path
      .as_deref()
      .ok_or_else(|| anyhow!("assembly metadata is missing its search root"))?;
    let locale = meta.locale.as_deref().unwrap_or("en");

    let mut contents = format!("//Module assembly: {}\n\n", meta.name);

    for file in &descriptor.files {
      let fragment_path = module_dir.join(file);
      let fragment = fs::read_to_string(&fragment_path)
        .with_context(|| format!("failed to read fragment {}", fragment_path.display()))?;
      append_fragment(&mut contents, &fragment, file);
    }

    let has_translations = self.append_translations(&mut contents, meta, base_path, locale)?;
    self.append_template(&mut contents, module_dir, has_translations)?;
    append_stylesheet_loader(&mut contents, meta, base_path);

    Ok(contents)
  }

  /// Inject the merged translation table as a `var lang` assignment.
  ///
  /// Returns whether any translation file existed for this module.
  fn append_translations(
    &self,
    contents: &mut String,
    meta: &ResolvedMeta,
    base_path: &Path,
    locale: &str,
  ) -> Result<bool> {
    let locales_dir = join_part(base_path.join("locales"), &meta.path_part);
    let locale_file = locales_dir.join(format!("{}_{}.json", meta.name, locale));
    let english_file = locales_dir.join(format!("{}_en.json", meta.name));

    if !locale_file.exists() && !english_file.exists() {
      return Ok(false);
    }

    let merged = merge_tables(load_table(&english_file)?, load_table(&locale_file)?);
    let rendered =
      serde_json::to_string(&merged).context("failed to serialize merged translations")?;
    append_fragment(
      contents,
      &format!("var lang = {rendered};"),
      &format!("{}_{}.json", meta.name, locale),
    );
    Ok(true)
  }

  fn append_template(
    &self,
    contents: &mut String,
    module_dir: &Path,
    has_translations: bool,
  ) -> Result<()> {
    let template_path = module_dir.join("template.html");
    if !template_path.exists() {
      return Ok(());
    }

    let template = fs::read_to_string(&template_path)
      .with_context(|| format!("failed to read {}", template_path.display()))?;
    let converted = self
      .converter
      .convert(&template, has_translations)
      .context("template conversion failed")?;
    append_fragment(contents, &converted, "template.html");
    Ok(())
  }
}

/// Append the stylesheet auto-load statement when the conventional CSS file
/// exists for this module.
fn append_stylesheet_loader(contents: &mut String, meta: &ResolvedMeta, base_path: &Path) {
  let stylesheet = join_part(base_path.join("css"), &meta.path_part)
    .join(format!("{}.css", meta.name));
  if !stylesheet.exists() {
    return;
  }

  let logical = if meta.path_part.is_empty() {
    format!("{}.css", meta.name)
  } else {
    format!("{}/{}.css", meta.path_part, meta.name)
  };
  append_fragment(contents, &format!("loadCSS('{logical}');"), "CSS auto import");
}

fn append_fragment(contents: &mut String, fragment: &str, label: &str) {
  contents.push_str(&format!(
    "/*\n * Included File: {label}\n */\n\n{fragment}\n\n"
  ));
}

fn join_part(base: PathBuf, part: &str) -> PathBuf {
  if part.is_empty() { base } else { base.join(part) }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::diagnostics::RecordingSink;
  use crate::resolve::{AssetIdentity, AssetKind, PathResolver};
  use std::fs;
  use tempfile::tempdir;

  struct UppercasingConverter;

  impl TemplateConverter for UppercasingConverter {
    fn convert(&self, html: &str, has_translations: bool) -> Result<String> {
      Ok(format!(
        "renderTemplate(\"{}\", {has_translations});",
        html.trim().to_uppercase()
      ))
    }
  }

  fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
  }

  fn resolve_assembly(root: &Path, locale: &str) -> ResolvedMeta {
    let resolver = PathResolver::new(vec![root.to_path_buf()]);
    let identity = AssetIdentity::with_locale(AssetKind::Script, "widgets", "menu", "js", locale);
    resolver.resolve(&identity).unwrap()
  }

  #[test]
  fn composes_fragments_in_descriptor_order_with_markers() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    write(root, "js/widgets/menu/assembly.json", r#"{"files": ["a.js", "b.js"]}"#);
    write(root, "js/widgets/menu/a.js", "var a = 1;");
    write(root, "js/widgets/menu/b.js", "var b = 2;");

    let sink = RecordingSink::default();
    let assembler = ModuleAssembler::new(&PassthroughConverter, &sink);
    let composed = assembler.assemble(&resolve_assembly(root, "en"));

    assert!(composed.starts_with("//Module assembly: menu\n\n"));
    let a_marker = composed.find("Included File: a.js").unwrap();
    let a_body = composed.find("var a = 1;").unwrap();
    let b_marker = composed.find("Included File: b.js").unwrap();
    let b_body = composed.find("var b = 2;").unwrap();
    assert!(a_marker < a_body && a_body < b_marker && b_marker < b_body);
    assert!(sink.records().is_empty());
  }

  #[test]
  fn merges_locale_translations_over_english_fallback() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    write(root, "js/widgets/menu/assembly.json", r#"{"files": []}"#);
    write(
      root,
      "locales/widgets/menu_en.json",
      r#"{"hello": "hello", "bye": "bye"}"#,
    );
    write(root, "locales/widgets/menu_fr.json", r#"{"hello": "bonjour"}"#);

    let sink = RecordingSink::default();
    let assembler = ModuleAssembler::new(&PassthroughConverter, &sink);
    let composed = assembler.assemble(&resolve_assembly(root, "fr"));

    assert!(composed.contains("Included File: menu_fr.json"));
    assert!(composed.contains(r#""hello":"bonjour""#));
    assert!(composed.contains(r#""bye":"bye""#));
    assert!(composed.contains("var lang = "));
  }

  #[test]
  fn english_fallback_alone_still_counts_as_translations() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    write(root, "js/widgets/menu/assembly.json", r#"{"files": []}"#);
    write(root, "locales/widgets/menu_en.json", r#"{"hello": "hello"}"#);
    write(root, "js/widgets/menu/template.html", "<p>menu</p>");

    let sink = RecordingSink::default();
    let assembler = ModuleAssembler::new(&UppercasingConverter, &sink);
    let composed = assembler.assemble(&resolve_assembly(root, "fr"));

    assert!(composed.contains(r#""hello":"hello""#));
    assert!(composed.contains("renderTemplate(\"<P>MENU</P>\", true);"));
  }

  #[test]
  fn converts_template_without_translations() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    write(root, "js/widgets/menu/assembly.json", r#"{"files": []}"#);
    write(root, "js/widgets/menu/template.html", "<p>menu</p>");

    let sink = RecordingSink::default();
    let assembler = ModuleAssembler::new(&UppercasingConverter, &sink);
    let composed = assembler.assemble(&resolve_assembly(root, "en"));

    assert!(composed.contains("Included File: template.html"));
    assert!(composed.contains("renderTemplate(\"<P>MENU</P>\", false);"));
  }

  #[test]
  fn appends_stylesheet_auto_load_statement() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    write(root, "js/widgets/menu/assembly.json", r#"{"files": []}"#);
    write(root, "css/widgets/menu.css", ".menu {}");

    let sink = RecordingSink::default();
    let assembler = ModuleAssembler::new(&PassthroughConverter, &sink);
    let composed = assembler.assemble(&resolve_assembly(root, "en"));

    assert!(composed.contains("Included File: CSS auto import"));
    assert!(composed.contains("loadCSS('widgets/menu.css');"));
  }

  #[test]
  fn missing_fragment_degrades_to_inert_comment() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    write(root, "js/widgets/menu/assembly.json", r#"{"files": ["ghost.js"]}"#);

    let sink = RecordingSink::default();
    let assembler = ModuleAssembler::new(&PassthroughConverter, &sink);
    let meta = resolve_assembly(root, "en");
    let composed = assembler.assemble(&meta);

    assert!(composed.starts_with("//Error building assembly '"));
    assert!(!composed.contains('\n'));

    let records = sink.records();
    assert_eq!(records.len(), 1);
    match &records[0] {
      Diagnostic::AssemblyBuild { assembly, .. } => {
        assert_eq!(assembly, &meta.main_file.display().to_string());
      }
      other => panic!("unexpected diagnostic {other:?}"),
    }
  }

  #[test]
  fn malformed_descriptor_degrades_to_inert_comment() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    write(root, "js/widgets/menu/assembly.json", "{not json");

    let sink = RecordingSink::default();
    let assembler = ModuleAssembler::new(&PassthroughConverter, &sink);
    let composed = assembler.assemble(&resolve_assembly(root, "en"));

    assert!(composed.starts_with("//Error building assembly '"));
    assert_eq!(sink.records().len(), 1);
  }

  #[test]
  fn malformed_translations_degrade_to_inert_comment() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    write(root, "js/widgets/menu/assembly.json", r#"{"files": []}"#);
    write(root, "locales/widgets/menu_en.json", "{not json");

    let sink = RecordingSink::default();
    let assembler = ModuleAssembler::new(&PassthroughConverter, &sink);
    let composed = assembler.assemble(&resolve_assembly(root, "en"));

    assert!(composed.starts_with("//Error building assembly '"));
    assert_eq!(sink.records().len(), 1);
  }
}
