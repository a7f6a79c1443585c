use maud::{html, Markup};

/// htmx navigation link with href fallback + hx-get for in-page swap.
pub fn nav_link(href: &str, body: Markup) -> Markup {
    html! {
        a href=(href)
          hx-get=(href)
          hx-target="main"
          hx-push-url="true"
          hx-swap="innerHTML" {
            (body)
        }
    }
}

/// Placeholder for a link that cannot be followed right now.
pub fn disabled_link(body: Markup) -> Markup {
    html! {
        a aria-disabled="true" { (body) }
    }
}

pub fn avatar(src: &str, name: &str) -> Markup {
    html! {
        img.avatar src=(src) alt=(name) width="32" height="32" loading="lazy";
    }
}
