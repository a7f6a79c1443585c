use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::{names, utils};

const PICO_CSS: &str = "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css";
const HTMX_JS: &str = "https://unpkg.com/htmx.org@2.0.4";

// Card tiers, the viewer's own row and the pinned row.
const LEADERBOARD_CSS: &str = "\
.highlights { display: grid; grid-template-columns: repeat(auto-fit, minmax(12rem, 1fr)); gap: 1rem; }
.card.first { border-top: 4px solid #f5b400; }
.card.second { border-top: 4px solid #a0a8b8; }
.card.third { border-top: 4px solid #c97b3c; }
.card.you { border-top: 4px solid #155dfc; }
.card .avatar, td .avatar { border-radius: 50%; }
tr.own { opacity: 0.5; }
figure.pinned { position: sticky; bottom: 0; background: var(--pico-background-color); }
.icon { margin-right: 0.25rem; }
";

// Flips Pico's `data-theme` and remembers the choice.
const THEME_JS: &str = "\
(function () {
  var saved = localStorage.getItem('theme');
  if (saved) document.documentElement.dataset.theme = saved;
})();
function toggleTheme() {
  var root = document.documentElement;
  var dark = root.dataset.theme === 'dark'
    || (!root.dataset.theme && matchMedia('(prefers-color-scheme: dark)').matches);
  root.dataset.theme = dark ? 'light' : 'dark';
  localStorage.setItem('theme', root.dataset.theme);
}
";

fn head(title: &str) -> Markup {
    html! {
        head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1";
            meta name="color-scheme" content="light dark";

            link rel="stylesheet" href=(PICO_CSS);
            style { (PreEscaped(LEADERBOARD_CSS)) }
            script src=(HTMX_JS) {}
            script { (PreEscaped(THEME_JS)) }

            title { (title) " - Leaderboard" }
        }
    }
}

fn header() -> Markup {
    html! {
        header {
            nav {
                ul {
                    li {
                        a href=(names::LEADERBOARD_URL) {
                            strong { "Leaderboard" }
                        }
                    }
                }
                ul {
                    li {
                        button.outline.secondary
                            type="button"
                            onclick="toggleTheme()"
                            aria-label="Toggle theme" {
                            "◐"
                        }
                    }
                }
            }
        }
    }
}

fn footer() -> Markup {
    html! {
        footer {
            small { "Scores refresh on every visit · v" (utils::VERSION) }
        }
    }
}

pub fn page(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            (head(title))
            body.container {
                (header())
                main { (body) }
                (footer())
            }
        }
    }
}

/// Body swapped into `main` by htmx; the title tag updates the document title.
pub fn titled(title: &str, body: Markup) -> Markup {
    html! {
        title { (title) " - Leaderboard" }
        (body)
    }
}

/// Full document for regular requests, a titled fragment for htmx swaps.
pub fn render(is_htmx: bool, title: &str, body: Markup) -> Markup {
    if is_htmx {
        titled(title, body)
    } else {
        page(title, body)
    }
}
