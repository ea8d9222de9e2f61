mod support;

use mdmend::{CompleteOptions, INCOMPLETE_LINK_URL, complete, complete_with};

#[test]
fn open_label_is_left_untouched() {
    assert_eq!(complete("Check [this out"), "Check [this out");
    assert_eq!(complete("["), "[");
    assert_eq!(complete("see [a [nested label"), "see [a [nested label");
}

#[test]
fn incomplete_url_is_rewritten_to_the_sentinel() {
    assert_eq!(
        complete("Check [this](http://ex"),
        "Check [this](mdmend:incomplete-link)"
    );
    assert_eq!(complete("[x]("), "[x](mdmend:incomplete-link)");
}

#[test]
fn sentinel_constant_matches_the_rewrite() {
    let out = complete("[docs](https://exa");
    assert_eq!(out, format!("[docs]({INCOMPLETE_LINK_URL})"));
    assert!(CompleteOptions::default().is_incomplete_link(INCOMPLETE_LINK_URL));
}

#[test]
fn nested_brackets_keep_the_full_label() {
    assert_eq!(
        complete("Text [foo [bar] baz]("),
        "Text [foo [bar] baz](mdmend:incomplete-link)"
    );
}

#[test]
fn unnested_paren_closes_the_url() {
    assert_eq!(complete("[a](u(v))"), "[a](u(v))");
    assert_eq!(complete("[a](u(v)"), "[a](mdmend:incomplete-link)");
}

#[test]
fn newline_abandons_the_url_stage() {
    let text = "[a](http://partial\nnext line";
    assert_eq!(complete(text), text);
}

#[test]
fn completed_links_pass_through() {
    let text = "See [docs](https://example.com/a_b) and [more](x).";
    assert_eq!(complete(text), text);
}

#[test]
fn emphasis_still_closes_around_a_sentinel_link() {
    assert_eq!(
        complete("**bold [link](http://ex"),
        "**bold [link](mdmend:incomplete-link)**"
    );
}

#[test]
fn emphasis_opened_inside_a_label_does_not_leak_out() {
    assert_eq!(
        complete("[a **b](http://ex"),
        "[a **b](mdmend:incomplete-link)"
    );
}

#[test]
fn trailing_image_fragment_is_dropped() {
    assert_eq!(complete("Before ![alt text"), "Before ");
    assert_eq!(complete("Before ![alt](http://img"), "Before ");
    assert_eq!(complete("![x"), "");
}

#[test]
fn earlier_text_survives_an_image_drop() {
    assert_eq!(
        complete("Some **bold** stays ![img"),
        "Some **bold** stays "
    );
}

#[test]
fn open_emphasis_before_a_dropped_image_still_closes() {
    assert_eq!(complete("**bold ![img"), "**bold **");
}

#[test]
fn completed_images_pass_through() {
    let text = "logo ![alt](https://img.example/x.png) end";
    assert_eq!(complete(text), text);
}

#[test]
fn escaped_bang_is_a_link_not_an_image() {
    assert_eq!(
        complete(r"ok \![label](http://ex"),
        r"ok \![label](mdmend:incomplete-link)"
    );
}

#[test]
fn custom_sentinel_url_is_used() {
    let opts = CompleteOptions {
        incomplete_link_url: "app:pending".to_string(),
        ..CompleteOptions::default()
    };
    assert_eq!(complete_with("go [here](http:", &opts), "go [here](app:pending)");
    assert!(opts.is_incomplete_link("app:pending"));
    assert!(!opts.is_incomplete_link(INCOMPLETE_LINK_URL));
}

#[test]
fn disabled_links_leave_the_tail_alone() {
    let opts = CompleteOptions {
        links: false,
        ..CompleteOptions::default()
    };
    assert_eq!(complete_with("see [x](http://e", &opts), "see [x](http://e");
}

#[test]
fn disabled_images_keep_the_fragment() {
    let opts = CompleteOptions {
        images: false,
        ..CompleteOptions::default()
    };
    assert_eq!(complete_with("pic ![alt tex", &opts), "pic ![alt tex");
}
