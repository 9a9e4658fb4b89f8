//! topic-graph: interactive hierarchical topic-network visualization.
//!
//! This crate provides a WASM canvas component that shows top-level topics on
//! a ring, expands a topic's subtopics around it on click, and highlights the
//! selected topic's neighborhood. The dataset is read from a JSON
//! `<script id="topic-data">` element, falling back to the bundled sample.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
mod pages;

pub use components::topic_graph::{
	ClickOutcome, Edge, EdgeKind, GraphModel, LayoutConfig, NodeId, TopicDataset, TopicDetail,
	TopicGraphCanvas, TopicGraphOptions, TopicGraphState, ValidationError, compute_layout,
};

use crate::pages::home::Home;
use crate::pages::not_found::NotFound;
use crate::pages::topic::TopicPage;

/// Id of the script element carrying the dataset JSON.
pub const DATA_ELEMENT_ID: &str = "topic-data";

/// Marine-science sample dataset shipped with the crate.
pub const SAMPLE_DATASET: &str = include_str!("../data/marine_topics.json");

/// Why the topic dataset could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
	#[error("no <script id=\"{0}\"> element in the document")]
	MissingElement(&'static str),
	#[error("failed to parse topic data: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("invalid topic data: {0}")]
	Invalid(#[from] ValidationError),
}

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("topic-graph: logging initialized");
}

/// Read the dataset JSON from the `topic-data` script element.
fn read_data_element() -> Result<String, LoadError> {
	let window: Window = web_sys::window().ok_or(LoadError::MissingElement(DATA_ELEMENT_ID))?;
	window
		.document()
		.and_then(|d| d.get_element_by_id(DATA_ELEMENT_ID))
		.and_then(|e| e.dyn_into::<HtmlScriptElement>().ok())
		.and_then(|s| s.text().ok())
		.ok_or(LoadError::MissingElement(DATA_ELEMENT_ID))
}

/// Parse and validate a dataset from JSON text.
pub fn parse_dataset(text: &str) -> Result<TopicDataset, LoadError> {
	let data = TopicDataset::from_json(text)?;
	GraphModel::from_dataset(&data)?;
	Ok(data)
}

/// Load the page's dataset, or the bundled sample if the page carries none.
pub fn load_dataset() -> Result<TopicDataset, LoadError> {
	let data = match read_data_element() {
		Ok(text) => parse_dataset(&text)?,
		Err(LoadError::MissingElement(id)) => {
			info!("topic-graph: no #{id} element, using bundled sample");
			parse_dataset(SAMPLE_DATASET)?
		}
		Err(e) => return Err(e),
	};
	info!(
		"topic-graph: loaded {} topics, {} categories, {} routes",
		data.topics.len(),
		data.categories.len(),
		data.routes.len()
	);
	Ok(data)
}

/// Main application component: the topic graph plus the pages it links to.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Marine Science Topics" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/:section/:topic") view=TopicPage />
			</Routes>
		</Router>
	}
}
