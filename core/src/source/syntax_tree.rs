use super::{FieldValue, Scalar, SourceId, SourceTree};
use arbor_syntax::{Field, NodeRef, Primitive, SyntaxTree};

impl From<NodeRef> for SourceId {
    fn from(node: NodeRef) -> Self {
        SourceId(u64::from(node.as_raw()))
    }
}

fn node_ref(id: SourceId) -> Option<NodeRef> {
    u32::try_from(id.0).ok().map(NodeRef::from_raw)
}

fn field_value(field: &Field) -> FieldValue<'_> {
    match field {
        Field::Node(node) => FieldValue::Node((*node).into()),
        Field::List(items) => FieldValue::List(items.iter().copied().map(SourceId::from).collect()),
        Field::Primitive(primitive) => FieldValue::Scalar(match primitive {
            Primitive::Int(i) => Scalar::Int(*i),
            Primitive::Float(x) => Scalar::Float(*x),
            Primitive::Str(s) => Scalar::Str(s.as_str()),
            Primitive::Bool(b) => Scalar::Bool(*b),
        }),
        Field::Absent => FieldValue::Absent,
    }
}

impl SourceTree for SyntaxTree {
    fn root(&self) -> Option<SourceId> {
        SyntaxTree::root(self).map(SourceId::from)
    }

    fn type_name(&self, id: SourceId) -> Option<&str> {
        self.kind(node_ref(id)?)
    }

    fn fields(&self, id: SourceId) -> Option<Vec<(&str, FieldValue<'_>)>> {
        let node = self.get(node_ref(id)?)?;
        Some(
            node.fields()
                .map(|(name, field)| (name, field_value(field)))
                .collect(),
        )
    }

    fn field(&self, id: SourceId, name: &str) -> Option<FieldValue<'_>> {
        SyntaxTree::field(self, node_ref(id)?, name).map(field_value)
    }

    fn list_len(&self, id: SourceId, name: &str) -> Option<usize> {
        self.list(node_ref(id)?, name).map(<[NodeRef]>::len)
    }

    fn list_item(&self, id: SourceId, name: &str, index: usize) -> Option<SourceId> {
        self.list(node_ref(id)?, name)?.get(index).copied().map(SourceId::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflects_parsed_fields_in_order() {
        let tree = arbor_syntax::parse("a = 10").expect("parse");
        let root = SourceTree::root(&tree).expect("root");
        assert_eq!(tree.type_name(root), Some("Module"));

        let fields = tree.fields(root).expect("fields");
        assert_eq!(fields.len(), 1);
        let (name, value) = &fields[0];
        assert_eq!(*name, "body");
        let FieldValue::List(body) = value else {
            panic!("body should be a list, got {value:?}");
        };

        let assign = body[0];
        assert_eq!(tree.type_name(assign), Some("Assign"));
        let names: Vec<_> = tree
            .fields(assign)
            .expect("assign fields")
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["targets", "value"]);

        let Some(FieldValue::Node(num)) = SourceTree::field(&tree, assign, "value") else {
            panic!("value should be a node");
        };
        assert_eq!(
            SourceTree::field(&tree, num, "n"),
            Some(FieldValue::Scalar(Scalar::Int(10)))
        );
    }

    #[test]
    fn unknown_ids_are_not_part_of_the_tree() {
        let tree = arbor_syntax::parse("pass").expect("parse");
        assert_eq!(tree.type_name(SourceId(999)), None);
        assert_eq!(tree.type_name(SourceId(u64::MAX)), None);
        assert!(tree.fields(SourceId(999)).is_none());
        assert_eq!(tree.list_len(SourceId(999), "body"), None);
    }

    /// Only the required methods, so list access goes through the provided fallbacks.
    struct Fields<'t>(&'t SyntaxTree);

    impl SourceTree for Fields<'_> {
        fn root(&self) -> Option<SourceId> {
            SourceTree::root(self.0)
        }

        fn type_name(&self, id: SourceId) -> Option<&str> {
            self.0.type_name(id)
        }

        fn fields(&self, id: SourceId) -> Option<Vec<(&str, FieldValue<'_>)>> {
            self.0.fields(id)
        }
    }

    #[test]
    fn indexed_list_access_matches_fields() {
        let tree = arbor_syntax::parse("a = 1\nf()\npass").expect("parse");
        let root = SourceTree::root(&tree).expect("root");
        let Some(FieldValue::List(body)) = SourceTree::field(&tree, root, "body") else {
            panic!("body should be a list");
        };
        let Some(FieldValue::Node(call)) = SourceTree::field(&tree, body[1], "value") else {
            panic!("call statement should hold a node");
        };

        let fallback = Fields(&tree);
        let sources: [&dyn SourceTree; 2] = [&tree, &fallback];
        for source in sources {
            assert_eq!(source.list_len(root, "body"), Some(3));
            assert_eq!(source.list_item(root, "body", 1), Some(body[1]));
            assert_eq!(source.list_item(root, "body", 3), None);
            // `starargs` is absent and reads as an empty list.
            assert_eq!(source.list_len(call, "starargs"), Some(0));
            assert_eq!(source.list_item(call, "starargs", 0), None);
            assert_eq!(source.list_len(body[0], "value"), None);
            assert_eq!(source.list_len(root, "missing"), None);
        }
    }
}
