use camino::Utf8PathBuf;
use cucumber::gherkin::Step;
use cucumber::{World, given, then, when};
use dirmatch_bdd::materialize;
use dirmatch_core::FsTreeView;
use dirmatch_core::adapters::{FsWritePort, InMemorySchemaSource};
use dirmatch_core::pipeline::run_check;
use dirmatch_core::settings::CheckSettings;
use dirmatch_types::DirectoryRequirement;
use dirmatch_types::report::{DirmatchReport, ReportStatus, ReportToolInfo};
use tempfile::TempDir;

#[derive(Debug, Default, World)]
pub struct DirmatchWorld {
    temp: Option<TempDir>,
    root: Option<Utf8PathBuf>,
    schema: Option<DirectoryRequirement>,
    report: Option<DirmatchReport>,
}

impl DirmatchWorld {
    fn root(&mut self) -> Utf8PathBuf {
        if self.root.is_none() {
            let td = tempfile::tempdir().expect("tempdir");
            self.root = Some(Utf8PathBuf::from_path_buf(td.path().to_path_buf()).unwrap());
            self.temp = Some(td);
        }
        self.root.clone().expect("root set")
    }

    fn report(&self) -> &DirmatchReport {
        self.report.as_ref().expect("check has run")
    }

    fn check(&mut self, dir: &str, strict: Option<bool>) {
        let root = self.root();
        let schema = self.schema.clone().expect("schema set");
        let settings = CheckSettings {
            root: Utf8PathBuf::from(dir),
            strict,
            out_dir: None,
        };
        let tool = ReportToolInfo {
            name: "dirmatch".to_string(),
            version: "0.0.0-bdd".to_string(),
            commit: None,
        };
        let outcome = run_check(
            &settings,
            &InMemorySchemaSource::new(schema),
            &FsTreeView::new(root),
            &FsWritePort,
            tool,
        )
        .expect("run_check");
        self.report = Some(outcome.report);
    }
}

#[given("the texture-pack preset")]
async fn texture_pack_preset(world: &mut DirmatchWorld) {
    world.schema = Some(dirmatch_schemas::find_preset("texture-pack").expect("preset"));
}

#[given("the schema:")]
async fn schema_doc(world: &mut DirmatchWorld, step: &Step) {
    let doc = step.docstring.as_deref().expect("schema docstring");
    let schema = dirmatch_schemas::parse_schema(doc, dirmatch_schemas::SchemaFormat::Json)
        .expect("valid schema");
    world.schema = Some(schema);
}

#[given("the tree:")]
async fn tree(world: &mut DirmatchWorld, step: &Step) {
    let root = world.root();
    let listing = step.docstring.as_deref().expect("tree docstring");
    for entry in listing.lines().map(str::trim).filter(|l| !l.is_empty()) {
        materialize(&root, entry).expect("materialize entry");
    }
}

#[when(expr = "I check {string}")]
async fn check(world: &mut DirmatchWorld, dir: String) {
    world.check(&dir, None);
}

#[when(expr = "I check {string} strictly")]
async fn check_strictly(world: &mut DirmatchWorld, dir: String) {
    world.check(&dir, Some(true));
}

#[then("the check passes")]
async fn check_passes(world: &mut DirmatchWorld) {
    let report = world.report();
    assert_eq!(
        report.verdict.status,
        ReportStatus::Pass,
        "findings: {:#?}",
        report.findings
    );
    assert!(report.result.success);
}

#[then("the check fails")]
async fn check_fails(world: &mut DirmatchWorld) {
    let report = world.report();
    assert_eq!(report.verdict.status, ReportStatus::Fail);
    assert!(!report.result.success);
}

#[then(expr = "the report has {int} findings")]
async fn finding_count(world: &mut DirmatchWorld, count: usize) {
    assert_eq!(world.report().findings.len(), count);
}

#[then(expr = "the report lists {string}")]
async fn report_lists(world: &mut DirmatchWorld, message: String) {
    let messages: Vec<_> = world
        .report()
        .findings
        .iter()
        .map(|f| f.message.as_str())
        .collect();
    assert!(
        messages.contains(&message.as_str()),
        "{message:?} not in {messages:#?}"
    );
}

#[then(expr = "the finding {string} is at {string}")]
async fn finding_location(world: &mut DirmatchWorld, message: String, path: String) {
    let finding = world
        .report()
        .findings
        .iter()
        .find(|f| f.message == message)
        .unwrap_or_else(|| panic!("no finding {message:?}"));
    assert_eq!(finding.location.path.as_str(), path);
}

#[then(expr = "the level {string} fails")]
async fn level_fails(world: &mut DirmatchWorld, level: String) {
    let nested = world
        .report()
        .result
        .nested_results
        .get(&level)
        .unwrap_or_else(|| panic!("no nested level {level:?}"));
    assert!(!nested.success);
}

#[tokio::main]
async fn main() {
    let features_path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("features");
    DirmatchWorld::cucumber().run(features_path).await;
}
