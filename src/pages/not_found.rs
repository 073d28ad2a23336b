use leptos::prelude::*;

/// 404 Not Found Page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"Lost in orbit"</h1>
			<p>"Nothing lives at this address."</p>
			<a href="/">"Back to the graph"</a>
		</div>
	}
}
