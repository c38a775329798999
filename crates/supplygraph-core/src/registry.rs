use std::collections::HashMap;

use crate::types::{Node, NodeType, ScopeId};

/// Position a node occupies on a route, which picks its default type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointRole {
    Plant,
    From,
    To,
}

impl EndpointRole {
    pub fn node_type(&self, id: &str) -> NodeType {
        match self {
            EndpointRole::Plant => NodeType::Supplier,
            EndpointRole::From => {
                if id.to_lowercase().contains("fac") {
                    NodeType::Factory
                } else {
                    NodeType::Distributor
                }
            }
            EndpointRole::To => NodeType::infer(id),
        }
    }
}

/// Insertion-ordered set of nodes for one job. The first registration of an id fixes its
/// type and product; later registrations return the existing entry untouched.
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    scope: ScopeId,
    order: Vec<Node>,
    index: HashMap<String, usize>,
}

impl NodeRegistry {
    pub fn new(scope: ScopeId) -> Self {
        Self {
            scope,
            order: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn scope(&self) -> &ScopeId {
        &self.scope
    }

    pub fn ensure(
        &mut self,
        id: &str,
        node_type: Option<NodeType>,
        product: Option<&str>,
    ) -> &Node {
        if let Some(&idx) = self.index.get(id) {
            return &self.order[idx];
        }

        let idx = self.order.len();
        self.order.push(Node {
            node_id: id.to_string(),
            node_type: node_type.unwrap_or_else(|| NodeType::infer(id)),
            scope_id: self.scope.clone(),
            product: product.map(str::to_string),
        });
        self.index.insert(id.to_string(), idx);
        &self.order[idx]
    }

    pub fn ensure_endpoint(&mut self, id: &str, role: EndpointRole) -> &Node {
        let node_type = role.node_type(id);
        self.ensure(id, Some(node_type), None)
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.order[idx])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.order
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> NodeRegistry {
        NodeRegistry::new(ScopeId::new("acme").expect("scope"))
    }

    #[test]
    fn infers_types_in_priority_order() {
        assert_eq!(NodeType::infer("RetailFactory"), NodeType::Store);
        assert_eq!(NodeType::infer("PlantSupplies"), NodeType::Factory);
        assert_eq!(NodeType::infer("SupplyDistrict"), NodeType::Supplier);
        assert_eq!(NodeType::infer("Warehouse-2"), NodeType::Distributor);
        assert_eq!(NodeType::infer("ProductA"), NodeType::Store);
    }

    #[test]
    fn first_registration_wins() {
        let mut registry = registry();
        registry.ensure("Hub", Some(NodeType::Distributor), Some("Widgets"));
        let again = registry.ensure("Hub", Some(NodeType::Factory), Some("Gadgets"));

        assert_eq!(again.node_type, NodeType::Distributor);
        assert_eq!(again.product.as_deref(), Some("Widgets"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn keeps_insertion_order_and_scope() {
        let mut registry = registry();
        for id in ["b", "a", "c", "a"] {
            registry.ensure(id, None, None);
        }

        let ids: Vec<&str> = registry.nodes().iter().map(|n| n.node_id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
        assert!(registry.nodes().iter().all(|n| n.scope_id.as_str() == "acme"));
    }

    #[test]
    fn endpoint_roles_pick_position_specific_types() {
        let mut registry = registry();

        let cases = [
            ("Factory1", EndpointRole::Plant, NodeType::Supplier),
            ("FacNorth", EndpointRole::From, NodeType::Factory),
            ("Dist1", EndpointRole::From, NodeType::Distributor),
            ("Store2", EndpointRole::To, NodeType::Store),
            ("SupA", EndpointRole::To, NodeType::Supplier),
        ];
        for (id, role, expected) in cases {
            assert_eq!(registry.ensure_endpoint(id, role).node_type, expected, "{id}");
        }
    }

    #[test]
    fn endpoint_does_not_reclassify_existing_node() {
        let mut registry = registry();
        registry.ensure("Factory9", None, None);

        let node = registry.ensure_endpoint("Factory9", EndpointRole::Plant);
        assert_eq!(node.node_type, NodeType::Factory);
    }
}
