//! Load the road graph from its JSON cache, generating it on first use

use std::fs;
use std::path::Path;

use super::generation::generate_network;
use super::graph::RoadGraph;
use crate::core::config::DispatchConfig;
use crate::core::error::{DispatchError, Result};

/// Load a cached graph from disk
pub fn load_graph(path: &Path) -> Result<RoadGraph> {
    let content = fs::read_to_string(path)?;
    let graph: RoadGraph = serde_json::from_str(&content)?;
    if graph.is_empty() {
        return Err(DispatchError::EmptyGraph);
    }
    Ok(graph)
}

/// Write the graph cache, replacing any existing file
pub fn save_graph(graph: &RoadGraph, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string(graph)?;
    fs::write(path, json)?;
    Ok(())
}

/// Use the cache at `path` if it exists, otherwise generate and cache
///
/// A cache that exists but cannot be parsed is an error; it is never
/// silently regenerated.
pub fn load_or_generate(path: &Path, config: &DispatchConfig) -> Result<RoadGraph> {
    if path.exists() {
        tracing::info!("Loading road graph from cache {}", path.display());
        let graph = load_graph(path)?;
        tracing::debug!(
            "Loaded {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        return Ok(graph);
    }

    tracing::info!("No road graph cache, generating network...");
    let graph = generate_network(&config.city, &config.network);
    if graph.is_empty() {
        return Err(DispatchError::EmptyGraph);
    }
    save_graph(&graph, path)?;
    tracing::info!("Road graph cached ({} edges)", graph.edge_count());
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::NetworkConfig;

    fn coarse_config() -> DispatchConfig {
        DispatchConfig {
            network: NetworkConfig {
                seed: 1,
                spacing: 0.02,
                jitter: 0.1,
            },
            ..DispatchConfig::default()
        }
    }

    #[test]
    fn test_generate_then_reuse_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache").join("road_graph.json");
        let config = coarse_config();

        let generated = load_or_generate(&path, &config).unwrap();
        assert!(path.exists());

        // A different seed must not matter once the cache exists
        let mut other = config.clone();
        other.network.seed = 99;
        let cached = load_or_generate(&path, &other).unwrap();

        assert_eq!(cached.node_count(), generated.node_count());
        assert_eq!(cached.edge_count(), generated.edge_count());
        for (a, b) in cached.nodes().zip(generated.nodes()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_corrupt_cache_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("road_graph.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_or_generate(&path, &coarse_config()).unwrap_err();
        assert!(matches!(err, DispatchError::SerdeError(_)));
    }

    #[test]
    fn test_cache_with_dangling_edge_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("road_graph.json");
        fs::write(
            &path,
            r#"{
                "nodes": [{"id": 1, "location": {"lat": 49.98, "lon": 36.25}}],
                "edges": [{"from": 1, "to": 99, "key": 0, "length_m": 120.0, "highway": "trunk"}]
            }"#,
        )
        .unwrap();

        let err = load_or_generate(&path, &coarse_config()).unwrap_err();
        match err {
            DispatchError::SerdeError(e) => assert!(e.to_string().contains("unknown endpoint")),
            other => panic!("expected SerdeError, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_cache_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("road_graph.json");
        fs::write(&path, r#"{"nodes": [], "edges": []}"#).unwrap();

        let err = load_graph(&path).unwrap_err();
        assert!(matches!(err, DispatchError::EmptyGraph));
    }
}
