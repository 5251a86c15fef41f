use super::*;

#[test]
fn loading_view_shows_placeholder() {
    let html = View::Loading.markup();
    assert!(html.contains("<p class=\"loading\">Loading\u{2026}</p>"));
    assert!(html.contains(":host"));
}

#[test]
fn fragment_view_is_verbatim() {
    assert_eq!(View::Fragment("<p>hi</p>").markup(), "<p>hi</p>");
}

#[test]
fn error_view_escapes_message() {
    let html = View::Error("HTTP 500: <b>oops</b> & \"more\"").markup();
    assert!(html.contains("Error: <code>HTTP 500: &lt;b&gt;oops&lt;/b&gt; &amp; &quot;more&quot;</code>"));
    assert!(!html.contains("<b>oops</b>"));
}

#[test]
fn escape_text_leaves_plain_text_alone() {
    assert_eq!(escape_text("network down"), "network down");
    assert_eq!(escape_text("it's"), "it&#39;s");
}

#[test]
fn scope_replaces_content_and_counts_renders() {
    let mut scope = IsolatedScope::new();
    assert_eq!(scope.inner_html(), "");
    assert_eq!(scope.render_count(), 0);

    scope.render(View::Loading);
    scope.render(View::Fragment("<p>hi</p>"));

    assert_eq!(scope.inner_html(), "<p>hi</p>");
    assert_eq!(scope.render_count(), 2);
}
