use data_dict::dict::suggest::SuggestEvent;
use data_dict::dict::{AggregationLevel, DictRepository, NodeKind, SearchQuery};
use data_dict::store::{KvStore, MemoryStore};
use serde_json::Value;
use data_dict::views::aggregate::AggregateView;
use data_dict::views::input::{InputView, SAVED_MSG};
use data_dict::views::list::{ListView, NOTHING_SELECTED_MSG};
use data_dict::views::search::{SearchView, NO_DATA_MSG};
use tempfile::tempdir;

mod mock_shell;
use mock_shell::MockShell;

fn repo_with_people() -> DictRepository<MemoryStore> {
    let repo = DictRepository::new(MemoryStore::new());
    repo.import_json(
        "people",
        r#"[{"name":"tom","age":22},{"name":"ann","age":30}]"#,
    )
    .unwrap();
    repo
}

/// Store whose disk has gone away.
struct FailingStore;

impl KvStore for FailingStore {
    fn get(&self, _key: &str) -> data_dict::dict::Result<Option<Value>> {
        Err(std::io::Error::other("disk gone").into())
    }

    fn set(&self, _key: &str, _value: Value) -> data_dict::dict::Result<()> {
        Err(std::io::Error::other("disk gone").into())
    }
}

fn geo_repo() -> DictRepository<MemoryStore> {
    let repo = DictRepository::new(MemoryStore::new());
    repo.import_json(
        "geo",
        r#"[
            {"region":"E","city":"NY","shop":"a"},
            {"region":"W","city":"LA","shop":"b"},
            {"region":"E","city":"NY","shop":"c"}
        ]"#,
    )
    .unwrap();
    repo
}

#[test]
fn keyword_without_colon_shows_no_results() {
    let repo = repo_with_people();
    let shell = MockShell::default();
    let mut view = SearchView::new();

    view.on_sub_input("people", &repo, &shell);
    assert_eq!(view.query(), &SearchQuery::new("people", ""));
    assert!(view.results().is_empty());
    assert!(view.columns().is_empty());
    assert!(shell.notes().is_empty());
}

#[test]
fn storage_failure_while_suggesting_is_reported() {
    let repo = DictRepository::new(FailingStore);
    let shell = MockShell::default();
    let mut view = SearchView::new();

    view.on_sub_input("peo", &repo, &shell);
    assert_eq!(
        shell.notes(),
        vec!["Operation failed: I/O error: disk gone".to_string()]
    );
    assert!(view.suggestions().suggestions.is_empty());
}

#[test]
fn sub_input_filters_records() {
    let repo = repo_with_people();
    let shell = MockShell::default();
    let mut view = SearchView::new();

    view.on_sub_input("people: AN", &repo, &shell);
    assert_eq!(view.results().len(), 1);
    assert_eq!(view.results()[0].text("name"), "ann");
    let titles: Vec<_> = view.columns().iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["name", "age", "Created"]);
    assert_eq!(view.title(), "Search results (1)");

    view.on_sub_input("", &repo, &shell);
    assert!(view.results().is_empty());
    assert_eq!(view.query(), &SearchQuery::default());
}

#[test]
fn unknown_keyword_reports_no_data() {
    let repo = repo_with_people();
    let shell = MockShell::default();
    let mut view = SearchView::new();

    view.on_sub_input("pets:rex", &repo, &shell);
    assert!(view.results().is_empty());
    assert_eq!(shell.last_note().as_deref(), Some(NO_DATA_MSG));
}

#[test]
fn opening_search_page_fills_sub_input() {
    let repo = repo_with_people();
    let shell = MockShell::default();
    let mut view = SearchView::new();

    view.open(SearchQuery::new("people", "tom"), &repo, &shell);
    assert_eq!(shell.sub_input().as_deref(), Some("people:tom"));
    assert_eq!(view.results().len(), 1);

    view.close(&shell);
    assert_eq!(shell.sub_input().as_deref(), Some(""));
    assert!(view.results().is_empty());
}

#[test]
fn tab_completes_keyword_suggestion() {
    let repo = repo_with_people();
    repo.import_json("pets", r#"[{"name":"rex"}]"#).unwrap();
    let shell = MockShell::default();
    let mut view = SearchView::new();

    view.on_sub_input("pe", &repo, &shell);
    assert_eq!(view.suggestions().suggestions.len(), 2);
    view.on_key(SuggestEvent::ArrowDown, &repo, &shell);
    let picked = view.suggestions().selected_suggestion().unwrap().to_string();

    view.on_key(SuggestEvent::Tab, &repo, &shell);
    assert_eq!(shell.sub_input(), Some(format!("{picked}:")));
    assert!(view.suggestions().suggestions.is_empty());
    assert!(view.results().is_empty());
}

#[test]
fn input_requires_json_then_keyword() {
    let repo = DictRepository::new(MemoryStore::new());
    let shell = MockShell::default();
    let mut view = InputView::new();

    view.form.keyword = "people".into();
    assert_eq!(view.submit(&repo, &shell), None);
    assert_eq!(shell.last_note().as_deref(), Some("JSON data is required"));

    view.form.keyword.clear();
    view.form.json_data = r#"[{"name":"tom"}]"#.into();
    assert_eq!(view.submit(&repo, &shell), None);
    assert_eq!(shell.last_note().as_deref(), Some("keyword is required"));

    view.form.json_data = r#"{"name":"tom"}"#.into();
    view.form.keyword = "people".into();
    assert_eq!(view.submit(&repo, &shell), None);
    assert!(repo.names().unwrap().is_empty());
    assert!(!view.awaiting_confirm());
}

#[test]
fn input_saves_then_continues_or_closes() {
    let repo = DictRepository::new(MemoryStore::new());
    let shell = MockShell::default();
    let mut view = InputView::new();
    view.form.keyword = "people".into();
    view.form.json_data = r#"[{"name":"tom"},{"name":"ann"}]"#.into();

    assert_eq!(view.submit(&repo, &shell), Some(2));
    assert_eq!(shell.last_note().as_deref(), Some(SAVED_MSG));
    assert!(view.awaiting_confirm());

    view.continue_entry();
    assert!(view.form.json_data.is_empty());
    assert!(!view.awaiting_confirm());

    view.close(&shell);
    assert!(*shell.left_plugin.lock().unwrap());
}

#[test]
fn list_opens_first_tab_newest_first() {
    let repo = repo_with_people();
    repo.import_json("pets", r#"[{"name":"rex"}]"#).unwrap();
    let shell = MockShell::default();
    let mut view = ListView::new(true);

    view.load(&repo, &shell);
    assert_eq!(view.active(), Some("people"));
    let labels: Vec<_> = view.tabs().into_iter().map(|(_, label)| label).collect();
    assert_eq!(labels, vec!["people (2)", "pets (1)"]);
    let titles: Vec<_> = view.columns().iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["name", "age", "Created", "Action"]);

    view.switch_tab("pets", &repo, &shell);
    assert_eq!(view.active(), Some("pets"));
    assert_eq!(view.rows().len(), 1);
    assert_eq!(view.columns().len(), 3);
}

#[test]
fn unknown_tab_is_reported_and_keeps_current_tab() {
    let repo = repo_with_people();
    repo.import_json("pets", r#"[{"name":"rex"}]"#).unwrap();
    let shell = MockShell::default();
    let mut view = ListView::new(false);
    view.load(&repo, &shell);

    assert!(!view.switch_tab("petz", &repo, &shell));
    assert_eq!(view.active(), Some("people"));
    assert_eq!(
        shell.last_note().as_deref(),
        Some("collection \"petz\" not found")
    );

    assert!(view.switch_tab("pets", &repo, &shell));
    assert_eq!(view.active(), Some("pets"));
}

#[test]
fn deleting_requires_a_selection() {
    let repo = repo_with_people();
    let shell = MockShell::default();
    let mut view = ListView::new(false);
    view.load(&repo, &shell);

    assert_eq!(view.delete_selected(&repo, &shell), 0);
    assert_eq!(shell.last_note().as_deref(), Some(NOTHING_SELECTED_MSG));

    let id = view.rows()[0].id().unwrap().to_string();
    view.toggle_selected(&id);
    assert_eq!(view.delete_selected(&repo, &shell), 1);
    assert_eq!(view.rows().len(), 1);
    assert!(view.selected().is_empty());
    assert_eq!(repo.collection("people").unwrap().len(), 1);
}

#[test]
fn clearing_moves_to_next_collection() {
    let repo = repo_with_people();
    repo.import_json("pets", r#"[{"name":"rex"}]"#).unwrap();
    let shell = MockShell::default();
    let mut view = ListView::new(false);
    view.load(&repo, &shell);

    assert!(view.clear_active(&repo, &shell));
    assert_eq!(view.active(), Some("pets"));
    assert!(view.clear_active(&repo, &shell));
    assert_eq!(view.active(), None);
    assert!(view.is_empty());
    assert!(!view.clear_active(&repo, &shell));
}

#[test]
fn manual_collection_accepts_form_records() {
    let repo = repo_with_people();
    let shell = MockShell::default();
    let mut view = ListView::new(true);
    view.load(&repo, &shell);

    assert!(!view.create_collection("people", "a,b", &repo, &shell));
    assert_eq!(
        shell.last_note().as_deref(),
        Some("collection \"people\" already exists")
    );

    assert!(view.create_collection("books", "title, author", &repo, &shell));
    assert_eq!(view.active(), Some("books"));
    let form = view.form(None);
    let keys: Vec<_> = form.iter().map(|f| f.key.as_str()).collect();
    assert_eq!(keys, vec!["title", "author"]);

    let values = vec![
        ("title".to_string(), "Dune".to_string()),
        ("author".to_string(), "Herbert".to_string()),
    ];
    assert!(view.save_form(None, values, &repo, &shell));
    let id = view.rows()[0].id().unwrap().to_string();

    let edit = view.form(Some(id.as_str()));
    assert_eq!(edit[0].value, "Dune");
    let values = vec![("title".to_string(), "Dune Messiah".to_string())];
    assert!(view.save_form(Some(id.as_str()), values, &repo, &shell));
    assert_eq!(view.rows()[0].text("title"), "Dune Messiah");
    assert_eq!(view.rows()[0].text("author"), "Herbert");
}

#[test]
fn export_writes_active_collection() {
    let dir = tempdir().unwrap();
    let repo = repo_with_people();
    let shell = MockShell::default();
    let mut view = ListView::new(false);
    view.load(&repo, &shell);

    let path = view.export_active(dir.path(), &repo, &shell).unwrap();
    assert!(path.ends_with("people_data.json"));
    assert!(shell.last_note().unwrap().starts_with("Exported to"));
}

#[test]
fn two_level_aggregation_groups_by_region_then_city() {
    let repo = geo_repo();
    let shell = MockShell::default();
    let mut view = AggregateView::open("geo", &repo, &shell);
    assert!(view.tree().is_empty());
    assert_eq!(view.fields(), ["region", "city", "shop"]);

    let config = vec![
        AggregationLevel::new(["region"]),
        AggregationLevel::new(["city"]),
    ];
    assert!(view.apply(config.clone(), &repo, &shell));

    let roots: Vec<_> = view.tree().iter().map(|n| n.title()).collect();
    assert_eq!(roots, vec!["region: E (2)", "region: W (1)"]);

    let east = &view.tree()[0];
    assert_eq!(east.children.len(), 1);
    let ny = &east.children[0];
    assert_eq!(ny.label, "city: NY");
    assert!(matches!(
        &ny.children[0].kind,
        NodeKind::Header { columns } if columns == &["shop".to_string()]
    ));
    assert_eq!(ny.children.iter().filter(|n| n.is_leaf()).count(), 2);

    let la = &view.tree()[1].children[0];
    assert_eq!(la.label, "city: LA");
    assert_eq!(la.children.iter().filter(|n| n.is_leaf()).count(), 1);
    assert_eq!(view.leaf_count(), 3);

    let reopened = AggregateView::open("geo", &repo, &shell);
    assert_eq!(reopened.config(), &config);
    assert_eq!(reopened.tree(), view.tree());
}

#[test]
fn resetting_aggregation_forgets_config() {
    let repo = geo_repo();
    let shell = MockShell::default();
    let mut view = AggregateView::open("geo", &repo, &shell);
    view.apply(vec![AggregationLevel::new(["region"])], &repo, &shell);
    view.reset(&repo, &shell);
    assert!(view.tree().is_empty());
    assert!(repo.aggregate_config("geo").unwrap().is_empty());
}
