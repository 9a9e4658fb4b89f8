use leptos::prelude::*;
use log::error;

use crate::components::topic_graph::TopicGraphCanvas;
use crate::load_dataset;

/// The topic graph, or a configuration error if the dataset is unusable.
#[component]
pub fn Home() -> impl IntoView {
	match load_dataset() {
		Ok(data) => {
			let dataset = Signal::derive(move || data.clone());
			view! {
				<div class="fullscreen-graph">
					<TopicGraphCanvas data=dataset fullscreen=true />
					<div class="graph-overlay">
						<h1>"Marine Science Topics"</h1>
						<p class="subtitle">"Click a topic to reveal its subtopics. Click it again to fold them away."</p>
					</div>
				</div>
			}
			.into_any()
		}
		Err(e) => {
			error!("topic-graph: {e}");
			view! {
				<div class="config-error">
					<h1>"The topic graph could not be shown"</h1>
					<p>{e.to_string()}</p>
				</div>
			}
			.into_any()
		}
	}
}
