use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_location;

use crate::load_dataset;

/// Landing page for a topic that has its own route.
#[component]
pub fn TopicPage() -> impl IntoView {
	let location = use_location();
	let data = load_dataset().ok();

	let title = move || {
		let path = location.pathname.get();
		data.as_ref()
			.and_then(|d| {
				let (&id, _) = d.routes.iter().find(|(_, route)| **route == path)?;
				d.topics.iter().find(|t| t.id == id)
			})
			.map(|t| t.name.clone())
			.unwrap_or(path)
	};

	view! {
		<div class="topic-page">
			<h1>{title}</h1>
			<A href="/">"Back to the topic graph"</A>
		</div>
	}
}
