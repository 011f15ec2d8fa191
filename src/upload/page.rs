//! The home page, where receipts are uploaded.

use axum::{extract::Query, response::IntoResponse};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, PreEscaped, html};
use serde::Deserialize;

use crate::{
    alert::Alert,
    category::TransactionKind,
    endpoints,
    html::{
        BUTTON_EXPENSE_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_REVENUE_STYLE, BUTTON_SECONDARY_STYLE,
        HeadElement, MODAL_BACKDROP_STYLE, MODAL_STYLE, PAGE_CONTAINER_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
    preferences::get_theme,
    upload::{MAX_BATCH_FILES, MAX_FILE_SIZE},
};

/// Reacts to the events sent after a save and hides the mode chooser once a
/// file has been picked.
///
/// Modals are hidden rather than removed: htmx dispatches the events on the
/// submitted form, which must still be in the document for them to bubble.
const UPLOAD_SCRIPT: &str = r#"
(function () {
    const hide = (id) => document.getElementById(id)?.classList.add('hidden');
    const show = (id) => document.getElementById(id)?.classList.remove('hidden');

    document.addEventListener('close-review-modal', () => hide('review-modal'));
    document.addEventListener('reset-review-form', () => document.getElementById('review-form')?.reset());
    document.addEventListener('show-success-modal', () => show('success-modal'));
    document.addEventListener('close-bulk-modal', () => hide('bulk-modal'));
    document.addEventListener('show-bulk-success-modal', () => show('bulk-success-modal'));

    document.addEventListener('htmx:beforeRequest', (event) => {
        if (event.target.closest && event.target.closest('#mode-chooser')) {
            hide('mode-chooser');
        }
    });
})();
"#;

/// Checks the picked files in the browser before the form is sent.
///
/// Mirrors the server checks and their messages, and cancels the request
/// through `htmx:confirm` so rejected files are never uploaded. The alert is
/// cloned from `#client-alert-template`.
fn upload_guard_script() -> String {
    format!(
        r#"
(function () {{
    const maxFiles = {MAX_BATCH_FILES};
    const maxFileSize = {MAX_FILE_SIZE};

    const isSupported = (file) =>
        file.type.startsWith('image/') ||
        file.type === 'application/pdf' ||
        file.name.toLowerCase().endsWith('.pdf');

    const singleError = (files) => {{
        const file = files[0];
        if (!file) return null;
        if (!isSupported(file)) return 'Por favor, selecione uma imagem ou PDF válido.';
        if (file.size > maxFileSize) return 'Arquivo muito grande. Tamanho máximo: 16MB';
        return null;
    }};

    const bulkError = (files) => {{
        if (files.length === 0) return 'Selecione pelo menos um arquivo.';
        if (files.length > maxFiles) {{
            return `Máximo de ${{maxFiles}} arquivos por vez. Você selecionou ${{files.length}}`;
        }}
        for (const file of files) {{
            if (!isSupported(file)) return `Arquivo inválido: ${{file.name}}`;
            if (file.size > maxFileSize) return `Arquivo muito grande: ${{file.name}}`;
        }}
        return null;
    }};

    const showAlert = (message) => {{
        const template = document.getElementById('client-alert-template');
        const current = document.getElementById('alert-container');
        if (!template || !current) return;

        const alert = template.content.firstElementChild.cloneNode(true);
        alert.querySelector('p').textContent = message;
        current.replaceWith(alert);
        htmx.process(alert);
    }};

    document.addEventListener('htmx:confirm', (event) => {{
        const form = event.detail.elt;
        const check = {{
            'single-upload-form': singleError,
            'bulk-upload-form': bulkError,
        }}[form.id];
        if (!check) return;

        const input = form.querySelector('input[type=file]');
        const error = check(Array.from(input.files));
        if (error === null) return;

        event.preventDefault();
        input.value = '';
        showAlert(error);
    }});
}})();
"#
    )
}

/// The query string of the upload page.
#[derive(Debug, Default, Deserialize)]
pub struct UploadPageQuery {
    /// The kind of transaction to add. Opens the mode chooser when valid.
    pub novo: Option<String>,
}

/// Display the page for adding expenses and revenue from receipts.
pub async fn get_upload_page(
    jar: PrivateCookieJar,
    Query(query): Query<UploadPageQuery>,
) -> impl IntoResponse {
    let theme = get_theme(&jar);
    let chooser_kind = query
        .novo
        .as_deref()
        .and_then(|kind| kind.parse::<TransactionKind>().ok());

    let nav_bar = NavBar::new(endpoints::ROOT, theme).into_html();
    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-xl space-y-6"
            {
                div class="text-center"
                {
                    h1 class="text-3xl font-bold" { "GestorBot" }
                    p class="mt-2 text-gray-600 dark:text-gray-300"
                    {
                        "Envie a foto ou o PDF de uma nota para registrar uma despesa ou receita."
                    }
                }

                div class="flex gap-4"
                {
                    a
                        href=(new_transaction_url(TransactionKind::Expense))
                        class=(BUTTON_EXPENSE_STYLE)
                    {
                        "Nova Despesa"
                    }
                    a
                        href=(new_transaction_url(TransactionKind::Revenue))
                        class=(BUTTON_REVENUE_STYLE)
                    {
                        "Nova Receita"
                    }
                }
            }
        }

        @if let Some(kind) = chooser_kind {
            (mode_chooser(kind))
        }

        div id="review-container" {}

        div id="loading-modal" class={ "htmx-indicator " (MODAL_BACKDROP_STYLE) }
        {
            div class="flex flex-col items-center gap-3 p-6 bg-white rounded-lg dark:bg-gray-800"
            {
                (loading_spinner())
                p class="text-sm" { "Lendo nota..." }
            }
        }

        (success_modal())
        (bulk_success_modal())

        template id="client-alert-template"
        {
            (Alert::ErrorSimple { message: String::new() }.into_html())
        }
    };

    let scripts = [
        HeadElement::ScriptSource(PreEscaped(UPLOAD_SCRIPT.to_owned())),
        HeadElement::ScriptSource(PreEscaped(upload_guard_script())),
    ];

    base("Enviar nota", theme, &scripts, &content)
}

fn new_transaction_url(kind: TransactionKind) -> String {
    format!("{}?novo={}", endpoints::ROOT, kind.as_str())
}

/// The choice between uploading one receipt and uploading several.
fn mode_chooser(kind: TransactionKind) -> Markup {
    let title = format!("Nova {}", kind.label());

    html! {
        div id="mode-chooser" class=(MODAL_BACKDROP_STYLE)
        {
            div class=(MODAL_STYLE) role="dialog" aria-modal="true" aria-labelledby="mode-title"
            {
                h2 id="mode-title" class="mb-4 text-xl font-bold" { (title) }

                form
                    id="single-upload-form"
                    hx-post=(endpoints::UPLOAD_RECEIPT)
                    hx-encoding="multipart/form-data"
                    hx-trigger="change"
                    hx-target="#review-container"
                    hx-target-error="#alert-container"
                    hx-indicator="#loading-modal"
                    class="mb-3"
                {
                    input type="hidden" name="tipo" value=(kind.as_str());
                    label for="input-camera" class={ "block text-center cursor-pointer " (BUTTON_PRIMARY_STYLE) }
                    {
                        "📷 Uma nota"
                    }
                    input
                        id="input-camera"
                        name="arquivo"
                        type="file"
                        accept="image/*,application/pdf"
                        class="hidden";
                }

                form
                    id="bulk-upload-form"
                    hx-post=(endpoints::UPLOAD_BATCH)
                    hx-encoding="multipart/form-data"
                    hx-trigger="change"
                    hx-target="#review-container"
                    hx-target-error="#alert-container"
                    hx-indicator="#loading-modal"
                    class="mb-3"
                {
                    input type="hidden" name="tipo" value=(kind.as_str());
                    label for="input-massa" class={ "block text-center cursor-pointer " (BUTTON_SECONDARY_STYLE) }
                    {
                        "🗂️ Várias notas (até " (MAX_BATCH_FILES) ")"
                    }
                    input
                        id="input-massa"
                        name="arquivos"
                        type="file"
                        accept="image/*,application/pdf"
                        multiple
                        class="hidden";
                }

                a href=(endpoints::ROOT) class="block text-center text-sm text-gray-500 hover:underline"
                {
                    "Cancelar"
                }
            }
        }
    }
}

fn success_modal() -> Markup {
    html! {
        div id="success-modal" class={ "hidden " (MODAL_BACKDROP_STYLE) }
        {
            div class=(MODAL_STYLE) role="dialog" aria-modal="true"
            {
                p class="mb-4 text-center text-lg font-semibold" { "✅ Salvo com sucesso!" }
                a href=(endpoints::ROOT) class={ "block text-center " (BUTTON_PRIMARY_STYLE) } { "OK" }
            }
        }
    }
}

fn bulk_success_modal() -> Markup {
    html! {
        div id="bulk-success-modal" class={ "hidden " (MODAL_BACKDROP_STYLE) }
        {
            div class=(MODAL_STYLE) role="dialog" aria-modal="true"
            {
                p id="bulk-success-text" class="mb-4 text-center text-lg font-semibold" {}
                a href=(endpoints::ROOT) class={ "block text-center " (BUTTON_PRIMARY_STYLE) } { "OK" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use scraper::{Html, Selector};

    use super::get_upload_page;
    use crate::{
        app_state::create_cookie_key,
        endpoints,
        test_utils::assert_hx_endpoint,
        upload::{MAX_BATCH_FILES, MAX_FILE_SIZE},
    };

    async fn get_page(uri: &str) -> Html {
        let app = Router::new()
            .route(endpoints::ROOT, get(get_upload_page))
            .with_state(create_cookie_key("foobar"));
        let server = TestServer::new(app).expect("Could not create test server.");

        let response = server.get(uri).await;

        response.assert_status_ok();
        Html::parse_document(&response.text())
    }

    fn select_one<'a>(html: &'a Html, selector: &str) -> Option<scraper::ElementRef<'a>> {
        html.select(&Selector::parse(selector).unwrap()).next()
    }

    #[tokio::test]
    async fn page_has_modals_and_no_chooser() {
        let html = get_page(endpoints::ROOT).await;

        assert!(select_one(&html, "#review-container").is_some());
        assert!(select_one(&html, "#loading-modal.htmx-indicator").is_some());
        assert!(select_one(&html, "#success-modal.hidden").is_some());
        assert!(select_one(&html, "#bulk-success-modal #bulk-success-text").is_some());
        assert!(select_one(&html, "#mode-chooser").is_none());

        let links = html
            .select(&Selector::parse("main a").unwrap())
            .filter_map(|link| link.value().attr("href"))
            .collect::<Vec<_>>();
        assert_eq!(links, ["/?novo=DESPESA", "/?novo=RECEITA"]);
    }

    #[tokio::test]
    async fn chooser_carries_the_kind() {
        let html = get_page("/?novo=RECEITA").await;

        let single = select_one(&html, "#single-upload-form").expect("single form missing");
        assert_hx_endpoint(&single, endpoints::UPLOAD_RECEIPT, "hx-post");
        let kind = select_one(&html, "#single-upload-form input[name=tipo]").unwrap();
        assert_eq!(kind.value().attr("value"), Some("RECEITA"));

        let bulk = select_one(&html, "#bulk-upload-form").expect("bulk form missing");
        assert_hx_endpoint(&bulk, endpoints::UPLOAD_BATCH, "hx-post");
        let files = select_one(&html, "#input-massa").unwrap();
        assert!(files.value().attr("multiple").is_some());
        assert_eq!(files.value().attr("name"), Some("arquivos"));
    }

    #[tokio::test]
    async fn guards_both_forms_before_sending() {
        let html = get_page("/?novo=DESPESA").await;

        let script = html
            .select(&Selector::parse("script").unwrap())
            .map(|script| script.inner_html())
            .find(|script| script.contains("htmx:confirm"))
            .expect("upload guard script missing");
        assert!(script.contains(&format!("const maxFiles = {MAX_BATCH_FILES};")));
        assert!(script.contains(&format!("const maxFileSize = {MAX_FILE_SIZE};")));
        assert!(script.contains("'single-upload-form': singleError"));
        assert!(script.contains("'bulk-upload-form': bulkError"));
        assert!(script.contains("event.preventDefault()"));
        assert!(script.contains("Arquivo muito grande. Tamanho máximo: 16MB"));
        assert!(script.contains("arquivos por vez. Você selecionou"));

        assert!(select_one(&html, "template#client-alert-template").is_some());
    }

    #[tokio::test]
    async fn unknown_kind_does_not_open_chooser() {
        let html = get_page("/?novo=TRANSFERENCIA").await;

        assert!(select_one(&html, "#mode-chooser").is_none());
    }
}
