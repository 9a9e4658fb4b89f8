//! End-to-end checks of the topic graph engine against the bundled dataset.

use std::collections::HashSet;

use topic_graph::{
	ClickOutcome, GraphModel, LayoutConfig, SAMPLE_DATASET, TopicDataset, TopicGraphState,
	compute_layout, parse_dataset,
};

fn dataset() -> TopicDataset {
	parse_dataset(SAMPLE_DATASET).expect("bundled dataset is valid")
}

fn state() -> TopicGraphState {
	TopicGraphState::from_dataset(&dataset(), 800.0, 600.0).expect("bundled dataset is valid")
}

fn close(a: f64, b: f64) -> bool {
	(a - b).abs() < 1e-9
}

#[test]
fn clusters_sit_on_the_outer_ring() {
	let state = state();
	let layout = state.layout();
	assert_eq!(layout.len(), 8);

	// min(800, 600) * 0.35 = 210; the third cluster is a quarter turn round.
	let third = layout.get(3).unwrap();
	assert!(close(third.x, 400.0) && close(third.y, 510.0), "{third:?}");
	assert_eq!(third.radius, 70.0);
	for (_, p) in layout.iter() {
		let r = ((p.x - 400.0).powi(2) + (p.y - 300.0).powi(2)).sqrt();
		assert!(close(r, 210.0));
	}
}

#[test]
fn expanding_and_collapsing_a_cluster() {
	let mut state = state();
	let before = state.layout().clone();

	assert_eq!(state.click(1), ClickOutcome::Expanded(1));
	let layout = state.layout();
	assert_eq!(layout.len(), 15);
	let center = layout.get(1).unwrap();
	for id in 101..=107 {
		let p = layout.get(id).unwrap();
		let r = ((p.x - center.x).powi(2) + (p.y - center.y).powi(2)).sqrt();
		assert!(close(r, 90.0), "leaf {id} at distance {r}");
		assert_eq!(p.radius, 50.0);
	}

	assert_eq!(state.click(1), ClickOutcome::Collapsed);
	assert_eq!(state.layout(), &before);
	assert_eq!(state.scene().node_count(), 8);
	assert!(state.highlight().is_none());
}

#[test]
fn selecting_a_cluster_dims_unrelated_topics() {
	let mut state = state();
	state.click(1);
	let set = state.highlight().unwrap();
	// Cluster 5 declares the link to 1 from its own side.
	let expected: HashSet<_> = [1, 2, 3, 5, 7, 8, 101, 102, 103, 104, 105, 106, 107].into();
	assert_eq!(set.nodes(), &expected);

	for id in [4, 6] {
		assert_eq!(state.scene().node(id).unwrap().target.opacity, 0.3);
	}
	assert_eq!(state.scene().node(1).unwrap().target.scale, 1.2);
}

#[test]
fn leaf_selection_only_lights_visible_neighbors() {
	let mut state = state();
	state.click(1);
	let layout = state.layout().clone();

	// 102 also links to 201, which lives under the collapsed cluster 2.
	let outcome = state.click(102);
	assert_eq!(
		outcome,
		ClickOutcome::Navigate("/biological/species-distribution".into())
	);
	assert_eq!(state.layout(), &layout);
	let set = state.highlight().unwrap();
	let expected: HashSet<_> = [1, 101, 102, 103, 106].into();
	assert_eq!(set.nodes(), &expected);
	assert!(!state.scene().contains(201));
}

#[test]
fn clicks_on_hidden_subtopics_change_nothing() {
	let mut state = state();
	assert_eq!(state.click(201), ClickOutcome::Ignored);
	assert_eq!(state.expanded(), None);
	assert_eq!(state.selected(), None);
	assert_eq!(state.click(4242), ClickOutcome::Ignored);
}

#[test]
fn switching_clusters_replaces_the_subtopic_ring() {
	let mut state = state();
	state.click(1);
	assert_eq!(state.click(2), ClickOutcome::Expanded(2));
	let visible: HashSet<_> = state.visible_ids().into_iter().collect();
	assert_eq!(visible.len(), 8 + 7);
	assert!(visible.contains(&213));
	assert!(!visible.contains(&101));
	// Small leaves are drawn smaller.
	assert_eq!(state.layout().get(213).unwrap().radius, 40.0);
}

#[test]
fn reset_returns_to_the_cluster_view() {
	let mut state = state();
	state.click(3);
	state.click(301);
	state.reset();
	assert_eq!(state.expanded(), None);
	assert_eq!(state.selected(), None);
	assert_eq!(state.visible_ids().len(), 8);
	assert!(state.scene().nodes().all(|n| n.target.opacity == 1.0));
}

#[test]
fn resize_is_debounced_and_rescales_rings() {
	let mut state = state();
	state.resize(0.0, 1000.0, 900.0);
	state.resize(50.0, 1200.0, 900.0);
	state.resize(100.0, 1600.0, 1200.0);
	assert!(!state.poll(200.0));
	assert_eq!(state.size(), (800.0, 600.0));
	assert!(state.poll(220.0));
	assert_eq!(state.size(), (1600.0, 1200.0));

	let third = state.layout().get(3).unwrap();
	assert!(close(third.x, 800.0) && close(third.y, 600.0 + 420.0));
	assert!(!state.poll(1000.0));
}

#[test]
fn detail_panel_for_a_leaf() {
	let mut state = state();
	state.select(604);
	assert_eq!(state.expanded(), Some(6));
	let detail = state.detail().unwrap();
	assert_eq!(detail.label, "Currents and Biodiversity");
	assert_eq!(detail.category, "Oceanography");
	assert_eq!(detail.parent.map(|p| p.label), Some("Biological Oceanography".into()));
	let related: Vec<_> = detail.related.iter().map(|r| r.id).collect();
	assert_eq!(related, [102, 601, 603]);
}

#[test]
fn legend_follows_dataset_order() {
	let state = state();
	let legend = state.legend();
	assert_eq!(legend.first().map(|(n, _)| n.as_str()), Some("Concepts"));
	assert_eq!(legend.len(), dataset().categories.len());
}

#[test]
fn layout_is_a_pure_function_of_its_inputs() {
	let data = dataset();
	let model = GraphModel::from_dataset(&data).unwrap();
	let config = LayoutConfig::default();
	let a = compute_layout(&model, 1024.0, 768.0, Some(5), &config);
	let b = compute_layout(&model, 1024.0, 768.0, Some(5), &config);
	assert_eq!(a, b);
	assert!(compute_layout(&model, 0.0, 768.0, Some(5), &config).is_empty());
}
