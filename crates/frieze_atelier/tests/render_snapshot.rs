//! Rendering snapshot tests.
//!
//! Each test compiles a page, binds it to the root scope and compares the
//! serialized document after one or more updates.

use std::cell::Cell;
use std::rc::Rc;

use serde_json::{json, Value};

use frieze_armature::parse_document;
use frieze_atelier::{compile, AtelierError, DirectiveFlags, DirectiveRegistry, Runtime};
use frieze_croquis::update_view;
use frieze_fresco::NodeId;
use frieze_relief::{EvalError, RenderOptions};

struct Page {
    rt: Runtime,
    root: NodeId,
}

impl Page {
    fn set(&mut self, name: &str, value: Value) {
        let scope = self.rt.scopes.root();
        self.rt.scopes.set(scope, name, value).unwrap();
    }

    fn update(&mut self) -> Result<(), AtelierError> {
        let scope = self.rt.scopes.root();
        update_view(&mut self.rt, scope)
    }

    fn html(&self) -> String {
        self.rt.document.to_html(self.root)
    }
}

fn page_with(markup: &str, registry: &DirectiveRegistry) -> Page {
    let options = RenderOptions::default();
    let doc = parse_document(markup, &options).unwrap();
    let root = doc.root().unwrap();
    let mut rt = Runtime::new(doc, options);
    let template = compile(&mut rt.document, registry, &rt.options, root).unwrap();
    let scope = rt.scopes.root();
    template.bind(&rt, root, scope).unwrap().init(&mut rt).unwrap();
    Page { rt, root }
}

fn page(markup: &str) -> Page {
    page_with(markup, &DirectiveRegistry::with_builtins())
}

// =============================================================================
// Repeat Tests
// =============================================================================

mod repeat {
    use super::*;

    const BOOKS: &str = r#"<ul><li ng-repeat="book in books" ng-bind="book.title"></li></ul>"#;

    #[test]
    fn compiled_page_holds_marker() {
        let page = page(BOOKS);
        insta::assert_snapshot!(page.html(), @"<ul><!--ng-repeat: book in books--></ul>");
    }

    #[test]
    fn renders_each_entry() {
        let mut page = page(BOOKS);
        page.set("books", json!([{ "title": "Moby" }, { "title": "Dune" }]));
        page.update().unwrap();
        insta::assert_snapshot!(
            page.html(),
            @r#"<ul><!--ng-repeat: book in books--><li ng-bind="book.title" ng-index="0">Moby</li><li ng-bind="book.title" ng-index="1">Dune</li></ul>"#
        );
    }

    #[test]
    fn grows_and_shrinks() {
        let mut page = page(BOOKS);
        page.set("books", json!([{ "title": "A" }]));
        page.update().unwrap();

        page.set("books", json!([{ "title": "A" }, { "title": "B" }, { "title": "C" }]));
        page.update().unwrap();
        insta::assert_snapshot!(
            page.html(),
            @r#"<ul><!--ng-repeat: book in books--><li ng-bind="book.title" ng-index="0">A</li><li ng-bind="book.title" ng-index="1">B</li><li ng-bind="book.title" ng-index="2">C</li></ul>"#
        );

        page.set("books", json!([{ "title": "C" }]));
        page.update().unwrap();
        insta::assert_snapshot!(
            page.html(),
            @r#"<ul><!--ng-repeat: book in books--><li ng-bind="book.title" ng-index="0">C</li></ul>"#
        );

        page.set("books", json!([]));
        page.update().unwrap();
        insta::assert_snapshot!(page.html(), @"<ul><!--ng-repeat: book in books--></ul>");
    }

    #[test]
    fn named_collection_follows_key_order() {
        let mut page = page(r#"<p ng-repeat="v in totals" ng-bind="v"></p>"#);
        page.set("totals", json!({ "z": 26, "a": 1 }));
        page.update().unwrap();
        insta::assert_snapshot!(
            page.html(),
            @r#"<!--ng-repeat: v in totals--><p ng-bind="v" ng-index="0">26</p><p ng-bind="v" ng-index="1">1</p>"#
        );
    }

    #[test]
    fn index_is_visible_to_instances() {
        let mut page = page(r#"<i ng-repeat="x in xs" ng-bind="$index + ':' + x"></i>"#);
        page.set("xs", json!(["a", "b"]));
        page.update().unwrap();
        insta::assert_snapshot!(
            page.html(),
            @r#"<!--ng-repeat: x in xs--><i ng-bind="$index + ':' + x" ng-index="0">0:a</i><i ng-bind="$index + ':' + x" ng-index="1">1:b</i>"#
        );
    }

    #[test]
    fn nested_repeats() {
        let mut page = page(concat!(
            r#"<div ng-repeat="shelf in shelves"><h2 ng-bind="shelf.name"></h2>"#,
            r#"<ul><li ng-repeat="book in shelf.books" ng-bind="book"></li></ul></div>"#,
        ));
        page.set(
            "shelves",
            json!([
                { "name": "A", "books": ["x", "y"] },
                { "name": "B", "books": [] },
            ]),
        );
        page.update().unwrap();
        insta::assert_snapshot!(
            page.html(),
            @r#"<!--ng-repeat: shelf in shelves--><div ng-index="0"><h2 ng-bind="shelf.name">A</h2><ul><!--ng-repeat: book in shelf.books--><li ng-bind="book" ng-index="0">x</li><li ng-bind="book" ng-index="1">y</li></ul></div><div ng-index="1"><h2 ng-bind="shelf.name">B</h2><ul><!--ng-repeat: book in shelf.books--></ul></div>"#
        );

        page.set("shelves", json!([{ "name": "B", "books": ["z"] }]));
        page.update().unwrap();
        insta::assert_snapshot!(
            page.html(),
            @r#"<!--ng-repeat: shelf in shelves--><div ng-index="0"><h2 ng-bind="shelf.name">B</h2><ul><!--ng-repeat: book in shelf.books--><li ng-bind="book" ng-index="0">z</li></ul></div>"#
        );
    }

    #[test]
    fn scalar_collection_leaves_dom_untouched() {
        let mut page = page(BOOKS);
        page.set("books", json!([{ "title": "Moby" }]));
        page.update().unwrap();
        let before = page.html();

        page.set("books", json!(7));
        let err = page.update().unwrap_err();
        assert!(matches!(err, AtelierError::CollectionType(_)));
        assert_eq!(page.html(), before);
    }

    #[test]
    fn undefined_collection_is_an_error() {
        let mut page = page(BOOKS);
        let err = page.update().unwrap_err();
        assert!(matches!(err, AtelierError::Eval(EvalError::Undefined { .. })));
    }

    #[test]
    fn exclusive_directive_compiles_its_siblings_once() {
        let invocations = Rc::new(Cell::new(0));
        let mut registry = DirectiveRegistry::with_builtins();
        let counter = Rc::clone(&invocations);
        registry.register(
            "x-count",
            move |_, _, _| {
                counter.set(counter.get() + 1);
                Ok(None)
            },
            DirectiveFlags::empty(),
        );

        let mut page = page_with(r#"<b ng-repeat="n in ns" x-count="yes"></b>"#, &registry);
        page.set("ns", json!([1, 2, 3]));
        page.update().unwrap();

        assert_eq!(invocations.get(), 1);
        insta::assert_snapshot!(
            page.html(),
            @r#"<!--ng-repeat: n in ns--><b x-count="yes" ng-index="0"></b><b x-count="yes" ng-index="1"></b><b x-count="yes" ng-index="2"></b>"#
        );
    }
}

// =============================================================================
// Binding Tests
// =============================================================================

mod binding {
    use super::*;

    #[test]
    fn bind_text_escapes() {
        let mut page = page(r#"<p ng-bind="note"></p>"#);
        page.set("note", json!("1 < 2 & 3"));
        page.update().unwrap();
        insta::assert_snapshot!(page.html(), @r#"<p ng-bind="note">1 &lt; 2 &amp; 3</p>"#);
    }

    #[test]
    fn bind_text_replaces_children() {
        let mut page = page(r#"<p ng-bind="n">placeholder <b>bold</b></p>"#);
        page.set("n", json!(42));
        page.update().unwrap();
        insta::assert_snapshot!(page.html(), @r#"<p ng-bind="n">42</p>"#);
    }

    #[test]
    fn bind_attr_sets_and_removes() {
        let mut page = page(r#"<a ng-bind-attr="{href: link.url, title: link.title}">go</a>"#);
        page.set("link", json!({ "url": "/a", "title": null }));
        page.update().unwrap();
        insta::assert_snapshot!(
            page.html(),
            @r#"<a ng-bind-attr="{href: link.url, title: link.title}" href="/a">go</a>"#
        );

        page.set("link", json!({ "url": "/a", "title": "Home" }));
        page.update().unwrap();
        insta::assert_snapshot!(
            page.html(),
            @r#"<a ng-bind-attr="{href: link.url, title: link.title}" href="/a" title="Home">go</a>"#
        );

        page.set("link", json!({ "url": "/b", "title": null }));
        page.update().unwrap();
        insta::assert_snapshot!(
            page.html(),
            @r#"<a ng-bind-attr="{href: link.url, title: link.title}" href="/b">go</a>"#
        );
    }

    #[test]
    fn bind_attr_rejects_scalars() {
        let mut page = page(r#"<a ng-bind-attr="link"></a>"#);
        page.set("link", json!("/a"));
        let err = page.update().unwrap_err();
        assert!(matches!(err, AtelierError::Eval(EvalError::Type(_))));
    }

    #[test]
    fn non_bindable_subtree_is_left_alone() {
        let mut page = page(
            r#"<div ng-non-bindable><span ng-bind="missing">raw</span></div><p ng-bind="x"></p>"#,
        );
        page.set("x", json!(1));
        page.update().unwrap();
        insta::assert_snapshot!(
            page.html(),
            @r#"<div ng-non-bindable=""><span ng-bind="missing">raw</span></div><p ng-bind="x">1</p>"#
        );
    }
}

// =============================================================================
// Evaluation Tests
// =============================================================================

mod evaluation {
    use super::*;

    #[test]
    fn init_runs_once_at_activation() {
        let mut page = page(r#"<p ng-init="greeting = 'hi'" ng-bind="greeting"></p>"#);
        page.update().unwrap();
        insta::assert_snapshot!(page.html(), @r#"<p ng-init="greeting = 'hi'" ng-bind="greeting">hi</p>"#);

        page.set("greeting", json!("bye"));
        page.update().unwrap();
        insta::assert_snapshot!(page.html(), @r#"<p ng-init="greeting = 'hi'" ng-bind="greeting">bye</p>"#);
    }

    #[test]
    fn eval_runs_every_update() {
        let mut page = page(r#"<p ng-eval="total = price * qty" ng-bind="total"></p>"#);
        page.set("price", json!(2));
        page.set("qty", json!(3));
        page.update().unwrap();
        insta::assert_snapshot!(page.html(), @r#"<p ng-eval="total = price * qty" ng-bind="total">6</p>"#);

        page.set("qty", json!(4));
        page.update().unwrap();
        insta::assert_snapshot!(page.html(), @r#"<p ng-eval="total = price * qty" ng-bind="total">8</p>"#);
    }

    #[test]
    fn watch_skips_first_fire() {
        let mut page = page(
            r#"<div ng-init="count = 0" ng-watch="name: count = count + 1"><span ng-bind="count"></span></div>"#,
        );
        page.set("name", json!("a"));
        page.update().unwrap();
        page.update().unwrap();
        let count = |page: &Page| page.rt.scopes.get(page.rt.scopes.root(), "count").cloned();
        assert_eq!(count(&page), Some(json!(0)));

        page.set("name", json!("b"));
        page.update().unwrap();
        assert_eq!(count(&page), Some(json!(1)));
        insta::assert_snapshot!(
            page.html(),
            @r#"<div ng-init="count = 0" ng-watch="name: count = count + 1"><span ng-bind="count">1</span></div>"#
        );
    }

    #[test]
    fn watch_list_runs_each_action() {
        let mut page = page(r#"<p ng-watch="a: seen = 'a'; b: other = 'b'"></p>"#);
        page.set("a", json!(1));
        page.set("b", json!(1));
        page.update().unwrap();

        page.set("b", json!(2));
        page.update().unwrap();
        let root = page.rt.scopes.root();
        assert_eq!(page.rt.scopes.get(root, "seen"), None);
        assert_eq!(page.rt.scopes.get(root, "other"), Some(&json!("b")));
    }
}
