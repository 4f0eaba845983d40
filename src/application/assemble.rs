//! Site assembly: render every item, execute runnable samples and write the
//! resulting documents.
//!
//! Render failures are isolated per item and execution failures per sample;
//! both are recorded in the [`BuildReport`] instead of aborting the build. Only
//! I/O failures while writing the site are fatal.

use std::{collections::BTreeSet, fmt, time::Instant};

use futures::{StreamExt, stream};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::{
    application::{
        error::AppError,
        registry::ItemRegistry,
        render::{RenderError, RenderService, RenderedPage},
        runner::{ExampleRunner, ExecutionError},
    },
    domain::{
        items::{Item, ItemId, RunTarget},
        slug::{is_page_file_name, page_file_name},
    },
    infra::output::SiteWriter,
    presentation::views::{
        CODE_CSS, CODE_CSS_PATH, IndexContext, IndexEntryView, IndexTemplate, ItemPageContext,
        ItemPageTemplate, LayoutChrome, LayoutContext, NavLinkView, RunView, SITE_CSS,
        SITE_CSS_PATH, SampleView, render_template,
    },
};

pub const INDEX_FILE: &str = "index.html";
pub const REPORT_FILE: &str = "report.json";

/// Per-sample execution results for one page, indexed by sample position.
/// `None` means the sample was not executed.
type SampleRuns = Vec<Option<Result<String, ExecutionError>>>;

/// Outcome of a site build, in registry order. Written as `report.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub site_title: String,
    pub output_dir: String,
    pub runner_enabled: bool,
    pub items: Vec<ItemReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    pub id: ItemId,
    pub title: String,
    pub outcome: ItemOutcome,
    /// One entry per runnable sample; empty when the item failed to render.
    pub samples: Vec<SampleReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Rendered { page: String, sha256: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleReport {
    /// 1-based position of the sample within its item.
    pub position: usize,
    pub label: String,
    pub target: String,
    pub outcome: SampleOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SampleOutcome {
    Passed { stdout_bytes: usize },
    Failed { error: ExecutionError },
    Skipped,
}

impl BuildReport {
    pub fn rendered(&self) -> impl Iterator<Item = &ItemReport> {
        self.items
            .iter()
            .filter(|item| matches!(item.outcome, ItemOutcome::Rendered { .. }))
    }

    pub fn failed_items(&self) -> impl Iterator<Item = &ItemReport> {
        self.items
            .iter()
            .filter(|item| matches!(item.outcome, ItemOutcome::Failed { .. }))
    }

    pub fn failed_samples(&self) -> impl Iterator<Item = (&ItemReport, &SampleReport)> {
        self.items.iter().flat_map(|item| {
            item.samples
                .iter()
                .filter(|sample| matches!(sample.outcome, SampleOutcome::Failed { .. }))
                .map(move |sample| (item, sample))
        })
    }

    /// Whether any item failed to render. Sample failures do not count.
    pub fn has_render_failures(&self) -> bool {
        self.failed_items().next().is_some()
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Built {} of {} item pages into {}",
            self.rendered().count(),
            self.items.len(),
            self.output_dir
        )?;
        for item in &self.items {
            match &item.outcome {
                ItemOutcome::Rendered { page, .. } => {
                    writeln!(f, "  ok      item {} -> {page}", item.id)?
                }
                ItemOutcome::Failed { reason } => {
                    writeln!(f, "  FAILED  item {} ({}): {reason}", item.id, item.title)?
                }
            }
        }
        for (item, sample) in self.failed_samples() {
            if let SampleOutcome::Failed { error } = &sample.outcome {
                writeln!(
                    f,
                    "  warning item {} sample `{}` ({}): example failed to run: {error}",
                    item.id, sample.label, sample.target
                )?;
            }
        }
        if !self.runner_enabled {
            writeln!(f, "  examples were not executed")?;
        }
        Ok(())
    }
}

/// Build the whole site for `registry` into `writer`.
///
/// Every item is rendered; runnable samples of rendered items are executed
/// with the runner's bounded concurrency; one page per rendered item is
/// written, followed by the index, stylesheets and the build report. Item
/// pages left over from earlier builds are removed, so the output directory
/// holds exactly the pages listed in the report.
pub async fn assemble(
    registry: &ItemRegistry,
    renderer: &dyn RenderService,
    runner: Option<&ExampleRunner>,
    writer: &SiteWriter,
) -> Result<BuildReport, AppError> {
    let started_at = Instant::now();

    let rendered: Vec<Result<RenderedPage, RenderError>> = registry
        .items()
        .iter()
        .map(|item| render_item(renderer, item))
        .collect();
    let pages: Vec<Option<&RenderedPage>> =
        rendered.iter().map(|result| result.as_ref().ok()).collect();

    let runs = run_samples(&pages, runner).await;
    let chrome = LayoutChrome::for_site(registry.site());
    let documents = linked_documents(&pages, &runs, |page, runs, previous, next| {
        page_document(&chrome, page, runs, previous, next)
    });

    let mut items = Vec::with_capacity(registry.len());
    for (index, (item, result)) in registry.items().iter().zip(&rendered).enumerate() {
        let report = match (result, documents[index].as_ref()) {
            (Ok(page), Some(Ok(html))) => {
                write_item_page(writer, page, &runs[index], html).await?
            }
            (Ok(page), document) => {
                let reason = match document {
                    Some(Err(err)) => err.to_string(),
                    _ => "page document was not produced".to_string(),
                };
                ItemReport {
                    id: page.id,
                    title: page.title.clone(),
                    outcome: ItemOutcome::Failed { reason },
                    samples: sample_reports(page, &runs[index]),
                }
            }
            (Err(err), _) => ItemReport {
                id: item.id(),
                title: item.title().to_string(),
                outcome: ItemOutcome::Failed {
                    reason: err.to_string(),
                },
                samples: Vec::new(),
            },
        };
        items.push(report);
    }

    let current: BTreeSet<String> = items
        .iter()
        .filter_map(|item| match &item.outcome {
            ItemOutcome::Rendered { page, .. } => Some(page.clone()),
            ItemOutcome::Failed { .. } => None,
        })
        .collect();
    let pruned = writer
        .prune(move |name| is_page_file_name(name) && !current.contains(name))
        .await?;
    if !pruned.is_empty() {
        info!(
            target = "lessonbook::assemble",
            op = "assemble::prune",
            result = "ok",
            removed = pruned.len(),
            "Removed pages from an earlier build"
        );
    }

    let report = BuildReport {
        site_title: registry.site().title.clone(),
        output_dir: writer.root().display().to_string(),
        runner_enabled: runner.is_some(),
        items,
    };

    write_index(writer, &chrome, registry, &report).await?;
    writer.write(SITE_CSS_PATH, SITE_CSS).await?;
    writer.write(CODE_CSS_PATH, CODE_CSS).await?;

    let report_json = serde_json::to_vec_pretty(&report)
        .map_err(|err| AppError::unexpected(format!("failed to serialise build report: {err}")))?;
    writer.write(REPORT_FILE, report_json).await?;

    let result = if report.has_render_failures() {
        "partial"
    } else {
        "ok"
    };
    info!(
        target = "lessonbook::assemble",
        op = "assemble::site",
        result,
        items = report.items.len(),
        rendered = report.rendered().count(),
        failed_samples = report.failed_samples().count(),
        output_dir = %report.output_dir,
        elapsed_ms = started_at.elapsed().as_millis() as u64,
        "Site assembled"
    );

    Ok(report)
}

/// Render the complete HTML document for a single item without writing
/// anything. Navigation links point at the item's registry neighbours.
pub async fn assemble_page(
    registry: &ItemRegistry,
    renderer: &dyn RenderService,
    runner: Option<&ExampleRunner>,
    id: ItemId,
) -> Result<String, AppError> {
    let items = registry.items();
    let index = items
        .iter()
        .position(|item| item.id() == id)
        .ok_or(AppError::NotFound(id))?;

    let page = renderer.render(&items[index])?;
    let runs = run_samples(&[Some(&page)], runner).await;

    let previous = index
        .checked_sub(1)
        .and_then(|prev| items.get(prev))
        .map(item_link);
    let next = items.get(index + 1).map(item_link);

    let chrome = LayoutChrome::for_site(registry.site());
    let html = page_document(&chrome, &page, &runs[0], previous, next)?;
    Ok(html)
}

fn render_item(renderer: &dyn RenderService, item: &Item) -> Result<RenderedPage, RenderError> {
    let started_at = Instant::now();
    let result = renderer.render(item);
    let elapsed_ms = started_at.elapsed().as_millis() as u64;

    match &result {
        Ok(page) => info!(
            target = "lessonbook::render",
            op = "render::item",
            result = "ok",
            item_id = page.id,
            samples = page.samples.len(),
            elapsed_ms,
            "Rendered item"
        ),
        Err(err) => warn!(
            target = "lessonbook::render",
            op = "render::item",
            result = "error",
            item_id = item.id(),
            elapsed_ms,
            error = %err,
            "Item failed to render"
        ),
    }

    result
}

/// Execute every runnable sample of the given pages. Results come back in
/// page and sample order whatever order the runs complete in.
async fn run_samples(
    pages: &[Option<&RenderedPage>],
    runner: Option<&ExampleRunner>,
) -> Vec<SampleRuns> {
    let mut runs: Vec<SampleRuns> = pages
        .iter()
        .map(|page| page.map_or_else(Vec::new, |page| vec![None; page.samples.len()]))
        .collect();

    let Some(runner) = runner else {
        return runs;
    };

    let jobs: Vec<(usize, usize, &RunTarget)> = pages
        .iter()
        .enumerate()
        .filter_map(|(page_index, page)| page.map(|page| (page_index, page)))
        .flat_map(|(page_index, page)| {
            page.runnable_samples().filter_map(move |(sample_index, sample)| {
                sample
                    .run
                    .as_ref()
                    .map(|target| (page_index, sample_index, target))
            })
        })
        .collect();

    let results: Vec<_> = stream::iter(jobs)
        .map(move |(page_index, sample_index, target)| async move {
            (page_index, sample_index, runner.run(target).await)
        })
        .buffered(runner.concurrency())
        .collect()
        .await;

    for (page_index, sample_index, result) in results {
        runs[page_index][sample_index] = Some(result);
    }
    runs
}

/// Produce the document of every rendered page. Links only point at pages
/// that end up with a document: when a page's template fails, its neighbours
/// are produced again with links that skip it.
fn linked_documents<F>(
    pages: &[Option<&RenderedPage>],
    runs: &[SampleRuns],
    mut document: F,
) -> Vec<Option<Result<String, RenderError>>>
where
    F: FnMut(
        &RenderedPage,
        &[Option<Result<String, ExecutionError>>],
        Option<NavLinkView>,
        Option<NavLinkView>,
    ) -> Result<String, RenderError>,
{
    let mut linked = pages.to_vec();
    let mut documents: Vec<Option<Result<String, RenderError>>> = vec![None; pages.len()];

    loop {
        let mut dropped = false;
        for (index, page) in pages.iter().enumerate() {
            let Some(page) = page else {
                continue;
            };
            if matches!(documents[index], Some(Err(_))) {
                continue;
            }

            let (previous, next) = rendered_neighbours(&linked, index);
            let result = document(page, &runs[index], previous, next);
            if let Err(err) = &result {
                warn!(
                    target = "lessonbook::assemble",
                    op = "assemble::page",
                    result = "error",
                    item_id = page.id,
                    error = %err,
                    "Item page template failed"
                );
                linked[index] = None;
                dropped = true;
            }
            documents[index] = Some(result);
        }

        if !dropped {
            return documents;
        }
    }
}

fn rendered_neighbours(
    pages: &[Option<&RenderedPage>],
    index: usize,
) -> (Option<NavLinkView>, Option<NavLinkView>) {
    let previous = pages[..index].iter().rev().flatten().next().copied().map(page_link);
    let next = pages[index + 1..].iter().flatten().next().copied().map(page_link);
    (previous, next)
}

fn page_link(page: &RenderedPage) -> NavLinkView {
    NavLinkView {
        href: page.file_name.clone(),
        title: page.title.clone(),
    }
}

fn item_link(item: &Item) -> NavLinkView {
    NavLinkView {
        href: page_file_name(item.id(), item.title()),
        title: item.title().to_string(),
    }
}

fn page_document(
    chrome: &LayoutChrome,
    page: &RenderedPage,
    runs: &[Option<Result<String, ExecutionError>>],
    previous: Option<NavLinkView>,
    next: Option<NavLinkView>,
) -> Result<String, RenderError> {
    let samples = page
        .samples
        .iter()
        .zip(runs)
        .map(|(sample, run)| SampleView {
            label: sample.label.clone(),
            language: sample.language.clone(),
            code_html: sample.code_html.clone(),
            run: sample.run.as_ref().map(|target| RunView {
                target: target.to_string(),
                output: run.as_ref().and_then(|result| result.as_ref().ok().cloned()),
                failure: run
                    .as_ref()
                    .and_then(|result| result.as_ref().err().map(ToString::to_string)),
            }),
        })
        .collect();

    let content = ItemPageContext {
        id: page.id,
        title: page.title.clone(),
        description_html: page.description_html.clone(),
        samples,
        previous,
        next,
    };
    let chrome = chrome.clone().with_page_title(&page.title);

    render_template(ItemPageTemplate {
        view: LayoutContext::new(chrome, content),
    })
}

fn sample_reports(
    page: &RenderedPage,
    runs: &[Option<Result<String, ExecutionError>>],
) -> Vec<SampleReport> {
    page.runnable_samples()
        .map(|(index, sample)| SampleReport {
            position: index + 1,
            label: sample.label.clone(),
            target: sample
                .run
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            outcome: match runs.get(index).and_then(Option::as_ref) {
                Some(Ok(stdout)) => SampleOutcome::Passed {
                    stdout_bytes: stdout.len(),
                },
                Some(Err(error)) => SampleOutcome::Failed {
                    error: error.clone(),
                },
                None => SampleOutcome::Skipped,
            },
        })
        .collect()
}

async fn write_item_page(
    writer: &SiteWriter,
    page: &RenderedPage,
    runs: &[Option<Result<String, ExecutionError>>],
    html: &str,
) -> Result<ItemReport, AppError> {
    let samples = sample_reports(page, runs);

    let sha256 = digest(html);
    writer.write(&page.file_name, html.as_bytes()).await?;

    info!(
        target = "lessonbook::assemble",
        op = "assemble::page",
        result = "ok",
        item_id = page.id,
        page = %page.file_name,
        sha256 = %sha256,
        "Wrote item page"
    );

    Ok(ItemReport {
        id: page.id,
        title: page.title.clone(),
        outcome: ItemOutcome::Rendered {
            page: page.file_name.clone(),
            sha256,
        },
        samples,
    })
}

async fn write_index(
    writer: &SiteWriter,
    chrome: &LayoutChrome,
    registry: &ItemRegistry,
    report: &BuildReport,
) -> Result<(), AppError> {
    let entries = report
        .items
        .iter()
        .map(|item| IndexEntryView {
            id: item.id,
            title: item.title.clone(),
            href: match &item.outcome {
                ItemOutcome::Rendered { page, .. } => Some(page.clone()),
                ItemOutcome::Failed { .. } => None,
            },
        })
        .collect();

    let content = IndexContext {
        description: registry.site().description.clone(),
        entries,
    };
    let html = render_template(IndexTemplate {
        view: LayoutContext::new(chrome.clone(), content),
    })?;
    writer.write(INDEX_FILE, html).await?;
    Ok(())
}

fn digest(document: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;
    use crate::{
        application::render::render_service,
        domain::items::{CodeSample, Site},
    };

    fn item(id: ItemId, title: &str, samples: Vec<CodeSample>) -> Item {
        Item::new(id, title, format!("Lesson body for **{title}**."), samples).expect("valid item")
    }

    fn registry(items: Vec<Item>) -> ItemRegistry {
        ItemRegistry::from_items(
            Site {
                title: "Objects".to_string(),
                description: None,
            },
            items,
        )
        .expect("unique ids")
    }

    async fn writer(dir: &TempDir) -> SiteWriter {
        SiteWriter::create(dir.path().join("site"))
            .await
            .expect("site writer")
    }

    fn read(dir: &TempDir, relative: &str) -> String {
        std::fs::read_to_string(dir.path().join("site").join(relative)).expect("read site file")
    }

    #[tokio::test]
    async fn writes_one_page_per_item_in_registry_order() {
        let dir = TempDir::new().expect("temp dir");
        let registry = registry(vec![
            item(1, "Alpha lesson", Vec::new()),
            item(2, "Beta lesson", Vec::new()),
            item(3, "Gamma lesson", Vec::new()),
        ]);
        let renderer = render_service();

        let report = assemble(&registry, renderer.as_ref(), None, &writer(&dir).await)
            .await
            .expect("site builds");

        let ids: Vec<_> = report.items.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(!report.has_render_failures());
        for item in &report.items {
            let ItemOutcome::Rendered { page, sha256 } = &item.outcome else {
                panic!("item {} not rendered", item.id);
            };
            assert_eq!(sha256.len(), 64);
            assert!(read(&dir, page).contains(&item.title));
        }

        let index = read(&dir, INDEX_FILE);
        let alpha = index.find("Alpha lesson").expect("alpha listed");
        let beta = index.find("Beta lesson").expect("beta listed");
        let gamma = index.find("Gamma lesson").expect("gamma listed");
        assert!(alpha < beta && beta < gamma);

        assert!(!read(&dir, CODE_CSS_PATH).is_empty());
        let json: serde_json::Value =
            serde_json::from_str(&read(&dir, REPORT_FILE)).expect("report is json");
        assert_eq!(json["items"].as_array().map(Vec::len), Some(3));
        assert_eq!(json["items"][0]["outcome"]["status"], "rendered");
    }

    #[tokio::test]
    async fn unlabeled_sample_fails_only_its_item() {
        let dir = TempDir::new().expect("temp dir");
        let registry = registry(vec![
            item(1, "Alpha lesson", vec![CodeSample::new("a").with_label("a.rs")]),
            item(2, "Broken lesson", vec![CodeSample::new("b")]),
            item(3, "Gamma lesson", Vec::new()),
        ]);
        let renderer = render_service();

        let report = assemble(&registry, renderer.as_ref(), None, &writer(&dir).await)
            .await
            .expect("site builds");

        assert!(report.has_render_failures());
        let failed: Vec<_> = report.failed_items().map(|item| item.id).collect();
        assert_eq!(failed, vec![2]);
        assert_eq!(report.rendered().count(), 2);

        let index = read(&dir, INDEX_FILE);
        assert!(index.contains("Broken lesson"));
        assert!(!index.contains(&page_file_name(2, "Broken lesson")));
        assert!(!dir.path().join("site").join(page_file_name(2, "Broken lesson")).exists());

        // Navigation skips the failed item.
        let alpha = read(&dir, &page_file_name(1, "Alpha lesson"));
        assert!(alpha.contains(&page_file_name(3, "Gamma lesson")));

        let summary = report.to_string();
        assert!(summary.contains("Built 2 of 3 item pages"), "{summary}");
        assert!(summary.contains("missing a label"), "{summary}");
    }

    #[tokio::test]
    async fn rebuild_removes_pages_that_are_no_longer_produced() {
        let dir = TempDir::new().expect("temp dir");
        let renderer = render_service();
        let first = registry(vec![
            item(1, "Alpha", Vec::new()),
            item(2, "Beta", Vec::new()),
            item(3, "Gamma", Vec::new()),
        ]);
        assemble(&first, renderer.as_ref(), None, &writer(&dir).await)
            .await
            .expect("first build");
        std::fs::write(dir.path().join("site/notes.txt"), "kept").expect("unrelated file");

        let second = registry(vec![
            item(1, "Alpha", Vec::new()),
            item(2, "Beta", vec![CodeSample::new("b")]),
            item(3, "Gamma renamed", Vec::new()),
        ]);
        let report = assemble(&second, renderer.as_ref(), None, &writer(&dir).await)
            .await
            .expect("second build");

        let failed: Vec<_> = report.failed_items().map(|item| item.id).collect();
        assert_eq!(failed, vec![2]);

        let mut pages: Vec<_> = std::fs::read_dir(dir.path().join("site"))
            .expect("list site")
            .flatten()
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| is_page_file_name(name))
            .collect();
        pages.sort();
        assert_eq!(
            pages,
            vec![
                page_file_name(1, "Alpha"),
                page_file_name(3, "Gamma renamed"),
            ]
        );
        assert!(dir.path().join("site/notes.txt").is_file());
    }

    #[test]
    fn navigation_skips_pages_whose_document_failed() {
        let renderer = render_service();
        let rendered: Vec<RenderedPage> = [
            item(1, "Alpha", Vec::new()),
            item(2, "Beta", Vec::new()),
            item(3, "Gamma", Vec::new()),
        ]
        .iter()
        .map(|item| renderer.render(item).expect("renders"))
        .collect();
        let pages: Vec<Option<&RenderedPage>> = rendered.iter().map(Some).collect();
        let runs: Vec<SampleRuns> = vec![Vec::new(); pages.len()];

        let documents = linked_documents(&pages, &runs, |page, _, previous, next| {
            if page.id == 2 {
                return Err(RenderError::Template {
                    message: "broken layout".to_string(),
                });
            }
            let href = |link: Option<NavLinkView>| link.map(|link| link.href).unwrap_or_default();
            Ok(format!("prev={} next={}", href(previous), href(next)))
        });

        let alpha = documents[0].clone().expect("alpha attempted").expect("alpha document");
        assert_eq!(alpha, format!("prev= next={}", page_file_name(3, "Gamma")));
        assert!(matches!(documents[1], Some(Err(RenderError::Template { .. }))));
        let gamma = documents[2].clone().expect("gamma attempted").expect("gamma document");
        assert_eq!(gamma, format!("prev={} next=", page_file_name(1, "Alpha")));
    }

    #[tokio::test]
    async fn rebuilding_produces_identical_digests() {
        let registry = registry(vec![item(
            1,
            "Alpha lesson",
            vec![CodeSample::new("fn main() {}").with_label("main.rs").with_language("rust")],
        )]);
        let renderer = render_service();

        let mut digests = Vec::new();
        for _ in 0..2 {
            let dir = TempDir::new().expect("temp dir");
            let report = assemble(&registry, renderer.as_ref(), None, &writer(&dir).await)
                .await
                .expect("site builds");
            digests.push(report.items[0].outcome.clone());
        }
        assert_eq!(digests[0], digests[1]);
    }

    #[tokio::test]
    async fn assembles_a_single_page_without_writing() {
        let registry = registry(vec![
            item(1, "Alpha lesson", Vec::new()),
            item(2, "Beta lesson", Vec::new()),
        ]);
        let renderer = render_service();

        let html = assemble_page(&registry, renderer.as_ref(), None, 2)
            .await
            .expect("page assembles");
        assert!(html.contains("Beta lesson"));
        assert!(html.contains(&page_file_name(1, "Alpha lesson")));

        let err = assemble_page(&registry, renderer.as_ref(), None, 9)
            .await
            .expect_err("unknown id");
        assert!(matches!(err, AppError::NotFound(9)));
    }

    #[cfg(unix)]
    fn shell(label: &str, script: &str) -> CodeSample {
        CodeSample::new(script)
            .with_label(label)
            .with_language("sh")
            .with_run(RunTarget::Command(vec![
                "sh".into(),
                "-c".into(),
                script.into(),
            ]))
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timed_out_sample_does_not_block_sibling_pages() {
        let dir = TempDir::new().expect("temp dir");
        let registry = registry(vec![
            item(1, "Alpha lesson", vec![shell("alpha.sh", "printf 'ran-%s' alpha")]),
            item(2, "Hung lesson", vec![shell("hung.sh", "sleep 10")]),
            item(3, "Gamma lesson", vec![shell("gamma.sh", "printf 'ran-%s' gamma")]),
        ]);
        let renderer = render_service();
        let runner = ExampleRunner::new("/nonexistent/lessonbook", Duration::from_millis(300))
            .with_concurrency(4);

        let started = Instant::now();
        let report = assemble(&registry, renderer.as_ref(), Some(&runner), &writer(&dir).await)
            .await
            .expect("site builds");
        assert!(started.elapsed() < Duration::from_secs(5));

        assert!(!report.has_render_failures());
        let failures: Vec<_> = report
            .failed_samples()
            .map(|(item, sample)| (item.id, sample.outcome.clone()))
            .collect();
        assert_eq!(
            failures,
            vec![(
                2,
                SampleOutcome::Failed {
                    error: ExecutionError::Timeout { timeout_ms: 300 }
                }
            )]
        );

        let alpha = read(&dir, &page_file_name(1, "Alpha lesson"));
        assert!(alpha.contains("ran-alpha"));
        let hung = read(&dir, &page_file_name(2, "Hung lesson"));
        assert!(hung.contains("example failed to run"));
        let gamma = read(&dir, &page_file_name(3, "Gamma lesson"));
        assert!(gamma.contains("ran-gamma"));

        let index = read(&dir, INDEX_FILE);
        let positions: Vec<_> = ["Alpha lesson", "Hung lesson", "Gamma lesson"]
            .iter()
            .map(|title| index.find(title).expect("listed"))
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
