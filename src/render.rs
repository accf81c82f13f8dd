use crate::catalog::{CatalogSnapshot, LoadStatus};
use crate::filter::TypeFilter;
use crate::models::{Addon, AddonType};
use crate::state::UiConfig;
use crate::theme::Theme;
use maud::{html, Markup, PreEscaped, DOCTYPE};

/// Shown once for a failed load; details go to the log
pub const LOAD_ERROR_MESSAGE: &str =
    "❌ Failed to load addons. Please check your connection or try again later.";
pub const EMPTY_STATE_MESSAGE: &str = "No addons match your search.";

/// Number of placeholder cards while the first load is pending
const SKELETON_CARDS: usize = 6;

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; transition: background .2s, color .2s; }
body.light { --bg: #f5f6f8; --fg: #1d1f23; --card: #fff; --muted: #6b7280; --accent: #2563eb; }
body.dark { --bg: #15171b; --fg: #e8eaed; --card: #22252b; --muted: #9aa0a6; --accent: #60a5fa; }
body { background: var(--bg); color: var(--fg); }
header, .controls, main { max-width: 1100px; margin: 0 auto; padding: 1rem; }
header { display: flex; justify-content: space-between; align-items: center; }
.controls { display: flex; gap: .5rem; flex-wrap: wrap; }
.controls input[type=search] { flex: 1; min-width: 200px; }
.controls input, .controls select, button { padding: .5rem; border-radius: 6px; border: 1px solid var(--muted); background: var(--card); color: var(--fg); }
.summary { color: var(--muted); font-size: .9rem; }
#addon-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 1rem; }
.card { background: var(--card); border-radius: 10px; overflow: hidden; box-shadow: 0 1px 3px rgba(0,0,0,.15); display: flex; flex-direction: column; }
.card-img-container img { width: 100%; height: 160px; object-fit: cover; display: block; }
.card-body { padding: 1rem; display: flex; flex-direction: column; gap: .4rem; flex: 1; }
.card-body h3 { margin: 0; }
.card-meta { display: flex; gap: .5rem; align-items: center; color: var(--muted); }
.tag { font-size: .75rem; font-weight: bold; padding: .1rem .4rem; border-radius: 4px; color: #fff; }
.tag-free { background: #16a34a; }
.tag-paid { background: #d97706; }
.btn { display: inline-block; text-align: center; padding: .5rem 1rem; border-radius: 6px; background: var(--accent); color: #fff; text-decoration: none; margin-top: auto; }
.btn-outline { background: transparent; color: var(--accent); border: 1px solid var(--accent); }
.details-link { color: var(--accent); font-size: .9rem; }
.card-skeleton .card-skeleton-img { height: 160px; background: var(--muted); opacity: .3; }
.card-skeleton .card-skeleton-text { height: .8rem; background: var(--muted); opacity: .3; border-radius: 4px; }
.card-skeleton .short { width: 60%; }
.error-message, .empty-state { grid-column: 1 / -1; text-align: center; padding: 2rem; }
.error-message { color: #dc2626; }
.details { background: var(--card); border-radius: 10px; padding: 1.5rem; border-top: 4px solid var(--accent); }
.details-header { display: flex; gap: 1rem; align-items: center; }
.details-header img { width: 96px; height: 96px; object-fit: cover; border-radius: 12px; }
.screenshots { display: flex; gap: .5rem; overflow-x: auto; }
.screenshots img { height: 180px; border-radius: 6px; }
.lightbox { display: none; position: fixed; inset: 0; background: rgba(0,0,0,.85); align-items: center; justify-content: center; }
.lightbox:target { display: flex; }
.lightbox img { max-width: 90vw; max-height: 90vh; }
.lightbox-close { position: absolute; top: 1rem; right: 1.5rem; color: #fff; font-size: 2rem; text-decoration: none; }
"#;

/// Submits the search form after the configured delay of typing inactivity
const SEARCH_SCRIPT: &str = r#"
(function () {
  var form = document.getElementById("search-form");
  var search = document.getElementById("search");
  var select = document.getElementById("filter-type");
  var delay = parseInt(form.dataset.debounce, 10) || 0;
  var timer;
  search.addEventListener("input", function () {
    clearTimeout(timer);
    timer = setTimeout(function () { form.submit(); }, delay);
  });
  select.addEventListener("change", function () { form.submit(); });
  if (search.value) {
    search.focus();
    search.setSelectionRange(search.value.length, search.value.length);
  }
})();
"#;

/// Everything the index page needs
pub struct IndexView<'a> {
    pub theme: Theme,
    pub query: &'a str,
    pub selector: TypeFilter,
    pub snapshot: &'a CatalogSnapshot,
    pub results: &'a [&'a Addon],
    pub ui: &'a UiConfig,
}

/// Catalog grid page. maud escapes every piece of catalog text on interpolation.
///
/// Skeleton cards stand in for the grid only until the first load completes.
pub fn index_page(view: &IndexView) -> Markup {
    let snapshot = view.snapshot;
    let pending = matches!(snapshot.status, LoadStatus::Idle | LoadStatus::Loading)
        && snapshot.loaded_at.is_none();
    let failed = snapshot.status.error().is_some();

    let body = html! {
        form #search-form .controls method="get" action="/" data-debounce=(view.ui.debounce_ms) {
            input #search type="search" name="q" value=(view.query)
                placeholder="Search addons..." aria-label="Search addons";
            select #filter-type name="type" aria-label="Filter by type" {
                option value="all" selected[view.selector == TypeFilter::All] { "All" }
                option value="free" selected[view.selector == TypeFilter::Only(AddonType::Free)] { "Free" }
                option value="paid" selected[view.selector == TypeFilter::Only(AddonType::Paid)] { "Paid" }
            }
            noscript { button type="submit" { "Search" } }
        }
        main {
            @if !pending {
                p .summary {
                    "Showing " (view.results.len()) " of " (snapshot.addons.len()) " addons"
                }
            }
            section #addon-grid aria-live="polite" {
                @if failed {
                    p .error-message role="alert" { (LOAD_ERROR_MESSAGE) }
                }
                @if pending {
                    @for _ in 0..SKELETON_CARDS {
                        (skeleton_card())
                    }
                } @else if view.results.is_empty() {
                    @if !failed || !snapshot.addons.is_empty() {
                        p .empty-state { (EMPTY_STATE_MESSAGE) }
                    }
                } @else {
                    @for addon in view.results {
                        (addon_card(addon, view.ui))
                    }
                }
            }
        }
        script { (PreEscaped(SEARCH_SCRIPT)) }
    };

    layout(view.theme, "Addon Store", body)
}

pub fn details_page(theme: Theme, addon: &Addon, ui: &UiConfig) -> Markup {
    let body = html! {
        main {
            a href="/" { "← Back to catalog" }
            article .details style=[accent_style(addon)] {
                div .details-header {
                    (addon_image(addon, ui))
                    div {
                        h2 { (addon.name) }
                        (addon_meta(addon))
                    }
                }
                p { (addon.long_description.as_deref().unwrap_or(&addon.description)) }
                @if let Some(min_version) = &addon.min_app_version {
                    p .card-meta { "Requires app version " (min_version) " or later" }
                }
                (action_link(addon, ui))
                @if !addon.screenshots.is_empty() {
                    h3 { "Screenshots" }
                    div .screenshots {
                        @for (index, url) in addon.screenshots.iter().enumerate() {
                            a href=(format!("#shot-{}", index)) {
                                img src=(url) alt=(screenshot_alt(addon, index)) loading="lazy";
                            }
                        }
                    }
                    @for (index, url) in addon.screenshots.iter().enumerate() {
                        div .lightbox id=(format!("shot-{}", index)) {
                            a .lightbox-close href="#" aria-label="Close" { "×" }
                            img src=(url) alt=(screenshot_alt(addon, index));
                        }
                    }
                }
            }
        }
    };

    layout(theme, &addon.name, body)
}

pub fn not_found_page(theme: Theme, key: &str) -> Markup {
    let body = html! {
        main {
            p .empty-state { "No addon named \"" (key) "\" in the catalog." }
            p { a href="/" { "← Back to catalog" } }
        }
    };

    layout(theme, "Addon not found", body)
}

fn layout(theme: Theme, title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body class=(theme.as_str()) {
                header {
                    h1 { a href="/" style="color: inherit; text-decoration: none" { "Addon Store" } }
                    div .controls {
                        form method="post" action="/reload" {
                            button type="submit" { "Reload" }
                        }
                        form method="post" action="/theme" {
                            button #theme-toggle type="submit" aria-label=(theme.toggle_label()) {
                                (theme.toggle_icon())
                            }
                        }
                    }
                }
                (body)
            }
        }
    }
}

fn addon_card(addon: &Addon, ui: &UiConfig) -> Markup {
    html! {
        article .card aria-label=(format!("{}, {} addon by {}", addon.name, addon.addon_type, addon.author)) {
            div .card-img-container { (addon_image(addon, ui)) }
            div .card-body {
                h3 { (addon.name) }
                p { (addon.description) }
                (addon_meta(addon))
                div .card-meta { small { "by " (addon.author) } }
                (action_link(addon, ui))
                a .details-link href=(details_href(addon)) { "Details" }
            }
        }
    }
}

fn skeleton_card() -> Markup {
    html! {
        div .card.card-skeleton aria-hidden="true" {
            div .card-skeleton-img {}
            div .card-body {
                p .card-skeleton-text {}
                p .card-skeleton-text {}
                p .card-skeleton-text.short {}
            }
        }
    }
}

fn addon_meta(addon: &Addon) -> Markup {
    html! {
        div .card-meta {
            span class=(format!("tag tag-{}", addon.addon_type)) { (addon.addon_type.label()) }
            span { "v" (addon.version) }
        }
    }
}

/// Icon with the placeholder substituted when missing or failing to load
fn addon_image(addon: &Addon, ui: &UiConfig) -> Markup {
    let src = if addon.icon.is_empty() {
        ui.image_placeholder.as_str()
    } else {
        addon.icon.as_str()
    };
    let fallback = format!(
        "this.onerror=null;this.src='{}'",
        ui.image_placeholder.replace('\'', "%27")
    );

    html! {
        img src=(src) alt=(addon.name) loading="lazy" onerror=(fallback);
    }
}

/// Download link for free addons, contact link for paid ones
fn action_link(addon: &Addon, ui: &UiConfig) -> Markup {
    html! {
        @if addon.is_paid() {
            a .btn.btn-outline href=(contact_href(addon, ui))
                aria-label=(format!("Contact to purchase {}", addon.name)) { "Contact Me" }
        } @else {
            a .btn href=(addon.file) download
                aria-label=(format!("Download {} v{}", addon.name, addon.version)) { "Download" }
        }
    }
}

pub fn contact_href(addon: &Addon, ui: &UiConfig) -> String {
    format!(
        "mailto:{}?subject={}",
        ui.contact_email,
        urlencoding::encode(&format!("Purchase {}", addon.name))
    )
}

pub fn details_href(addon: &Addon) -> String {
    format!("/addons/{}", urlencoding::encode(addon.key()))
}

fn screenshot_alt(addon: &Addon, index: usize) -> String {
    format!("{} screenshot {}", addon.name, index + 1)
}

/// Accent color override, only for plain color tokens like `#ff8800` or `teal`
fn accent_style(addon: &Addon) -> Option<String> {
    let color = addon.color.as_deref()?;
    let plain = color.len() <= 32 && color.chars().all(|c| c.is_ascii_alphanumeric() || c == '#');
    plain.then(|| format!("--accent: {}", color))
}
