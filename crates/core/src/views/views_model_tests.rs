//! Tests for view shapes and selection resolution.

#[cfg(test)]
mod tests {
    use crate::constants::DEFAULT_VIEW_NAME;
    use crate::data::AssetClass;
    use crate::views::{
        default_view_selection, default_views, ClassViews, ColumnGroup, View, ViewSelection,
        ViewsAvailable,
    };
    use serde_json::json;
    use std::collections::BTreeMap;

    fn views() -> ViewsAvailable {
        let mut class_views = ClassViews::default();
        class_views.upsert_row_view(View::new("Bancos", vec!["ITUB4".into(), "BBDC4".into()]));
        class_views.upsert_row_view(View::new("Energia", vec!["TAEE11".into(), "ITUB4".into()]));
        class_views.upsert_col_view(View::new(
            "Renda",
            vec![ColumnGroup {
                group: "Fundamentos".into(),
                keys: vec!["statusinvest.dy".into()],
            }],
        ));
        BTreeMap::from([(AssetClass::BrStocks, class_views)])
    }

    #[test]
    fn test_selected_rows_union_without_duplicates() {
        let selection = ViewSelection {
            asset_class: AssetClass::BrStocks,
            row_view_names: BTreeMap::from([(
                AssetClass::BrStocks,
                vec!["Bancos".to_string(), "Energia".to_string(), "Sumiu".to_string()],
            )]),
            col_view_names: BTreeMap::new(),
        };

        assert_eq!(
            selection.selected_rows(AssetClass::BrStocks, &views()),
            vec!["ITUB4", "BBDC4", "TAEE11"]
        );
        assert!(selection.selected_rows(AssetClass::BrReits, &views()).is_empty());
    }

    #[test]
    fn test_selected_columns() {
        let selection = ViewSelection {
            asset_class: AssetClass::BrStocks,
            row_view_names: BTreeMap::new(),
            col_view_names: BTreeMap::from([(AssetClass::BrStocks, vec!["Renda".to_string()])]),
        };

        let columns = selection.selected_columns(AssetClass::BrStocks, &views());
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].keys, vec!["statusinvest.dy"]);
    }

    #[test]
    fn test_upsert_replaces_by_name() {
        let mut class_views = ClassViews::default();
        class_views.upsert_row_view(View::new("A", vec!["X".to_string()]));
        class_views.upsert_row_view(View::new("A", vec!["Y".to_string()]));

        assert_eq!(class_views.row_views.len(), 1);
        assert_eq!(class_views.row_views[0].items, vec!["Y"]);
        assert!(class_views.remove_row_view("A"));
        assert!(!class_views.remove_row_view("A"));
    }

    #[test]
    fn test_defaults_cover_every_asset_class() {
        let views = default_views();
        let selection = default_view_selection();

        for class in AssetClass::ALL {
            assert_eq!(views[&class].row_views[0].name, DEFAULT_VIEW_NAME);
            assert!(!selection.selected_columns(class, &views).is_empty());
        }
    }

    #[test]
    fn test_views_serialize_camel_case() {
        let value = serde_json::to_value(&views()).unwrap();
        assert_eq!(
            value["br_stocks"]["colViews"][0],
            json!({"name": "Renda", "items": [{"group": "Fundamentos", "keys": ["statusinvest.dy"]}]})
        );
        assert!(value["br_stocks"]["rowViews"].is_array());
    }

    #[test]
    fn test_views_without_items_read_as_empty() {
        let parsed: ClassViews = serde_json::from_value(json!({
            "rowViews": [{ "name": "Vazia" }],
            "colViews": [{ "name": "Sem Grupos" }, { "name": "Um", "items": [{ "group": "G" }] }]
        }))
        .unwrap();

        assert!(parsed.row_views[0].items.is_empty());
        assert!(parsed.col_views[0].items.is_empty());
        assert_eq!(
            parsed.col_views[1].items,
            vec![ColumnGroup {
                group: "G".into(),
                keys: Vec::new(),
            }]
        );

        let reparsed: ClassViews =
            serde_json::from_value(serde_json::to_value(&parsed).unwrap()).unwrap();
        assert_eq!(reparsed, parsed);
    }
}
