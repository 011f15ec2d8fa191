use scraper::{ElementRef, Html, Selector};

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&Selector::parse("form").unwrap())
        .next()
        .expect("No form found")
}

/// Assert that `element` sends its request to `endpoint` through the htmx `attribute`.
#[track_caller]
pub(crate) fn assert_hx_endpoint(element: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let got = element
        .value()
        .attr(attribute)
        .unwrap_or_else(|| panic!("{attribute} attribute missing"));

    assert_eq!(
        got, endpoint,
        "want {attribute}=\"{endpoint}\", got {got:?}"
    );
}

/// The required input named `name`, checked to be of type `type_`.
#[track_caller]
pub(crate) fn must_get_required_input<'a>(
    form: &ElementRef<'a>,
    name: &str,
    type_: &str,
) -> ElementRef<'a> {
    let selector = Selector::parse(&format!("input[name=\"{name}\"]")).unwrap();
    let input = form
        .select(&selector)
        .next()
        .unwrap_or_else(|| panic!("No input named \"{name}\""));

    let got_type = input.value().attr("type").unwrap_or_default();
    assert_eq!(got_type, type_, "want {name} input of type \"{type_}\"");
    assert!(
        input.value().attr("required").is_some(),
        "want {name} input to be required"
    );

    input
}
