use maud::{html, Markup, DOCTYPE};

/// Single narrow column, sized for a phone held in one hand.
pub fn mobile_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href="/static/main.css";
                script src="https://unpkg.com/htmx.org@1.9.12" defer {};
            }
            body {
                main class="max-w-[390px] mx-auto p-6" {
                    (content)
                }
            }
        }
    }
}
