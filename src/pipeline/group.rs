use std::collections::HashMap;
use std::hash::Hash;

/// Groups `items` by the key returned from `key_of`.
///
/// Groups appear in the order their key was first encountered, and items keep
/// their relative input order within a group. Runs in O(n) using a hash index
/// from key to group position.
pub fn group_by<I, K, F>(items: I, mut key_of: F) -> Vec<(K, Vec<I::Item>)>
where
    I: IntoIterator,
    K: Eq + Hash + Clone,
    F: FnMut(&I::Item) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<I::Item>)> = Vec::new();

    for item in items {
        let key = key_of(&item);
        match index.get(&key) {
            Some(&pos) => groups[pos].1.push(item),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![item]));
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_empty() {
        let groups = group_by(Vec::<(i64, &str)>::new(), |r| r.0);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_group_by_keeps_first_seen_key_order() {
        let items = vec![(3, "a"), (1, "b"), (3, "c"), (2, "d"), (1, "e")];
        let groups = group_by(items, |r| r.0);

        let keys: Vec<i32> = groups.iter().map(|g| g.0).collect();
        assert_eq!(keys, vec![3, 1, 2]);
    }

    #[test]
    fn test_group_by_is_stable_within_group() {
        let items = vec![(3, "a"), (1, "b"), (3, "c"), (2, "d"), (1, "e")];
        let groups = group_by(items, |r| r.0);

        assert_eq!(groups[0].1, vec![(3, "a"), (3, "c")]);
        assert_eq!(groups[1].1, vec![(1, "b"), (1, "e")]);
        assert_eq!(groups[2].1, vec![(2, "d")]);
    }

    #[test]
    fn test_regrouping_flattened_groups_is_identity() {
        let items = vec!["b1", "a1", "b2", "c1", "a2", "b3"];
        let groups = group_by(items, |s| s.as_bytes()[0]);

        let flattened: Vec<&str> = groups.iter().flat_map(|g| g.1.clone()).collect();
        let regrouped = group_by(flattened, |s| s.as_bytes()[0]);

        assert_eq!(groups, regrouped);
    }

    #[test]
    fn test_group_by_borrowed_items_with_string_keys() {
        let records = vec![
            ("2021-01-01".to_string(), 5),
            ("2021-01-02".to_string(), 2),
            ("2021-01-01".to_string(), 3),
        ];
        let groups = group_by(&records, |r| r.0.clone());

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "2021-01-01");
        assert_eq!(groups[0].1.iter().map(|r| r.1).sum::<i32>(), 8);
    }
}
