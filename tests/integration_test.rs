use suffix_tree_lcs;

use mediumvec::{vec32, Vec32};

#[cfg(test)]
mod tests {

    use super::*;

    fn to_string(s: &Vec32<char>) -> String {
        s.iter().collect()
    }

    /// Longest common substring length by dynamic programming, for cross-checks.
    fn brute_force_lcs_len(a: &str, b: &str) -> usize {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let mut best = 0;
        let mut prev = vec![0usize; b.len() + 1];
        for i in 1..=a.len() {
            let mut cur = vec![0usize; b.len() + 1];
            for j in 1..=b.len() {
                if a[i - 1] == b[j - 1] {
                    cur[j] = prev[j - 1] + 1;
                    best = best.max(cur[j]);
                }
            }
            prev = cur;
        }
        best
    }

    fn assert_all_substrings(tree: &suffix_tree_lcs::SuffixTree, s: &[char]) {
        for i in 0..s.len() {
            for j in i..s.len() {
                let piece: String = s[i..(j + 1)].iter().collect();
                assert!(tree.contains(&piece), "{:?} should be a substring", piece);
            }
        }
    }

    #[test]
    fn test_contains() {
        let s1: &[char] = &vec32!['a', 'b', 'c', 'd', 'e', 'f'];
        let text: String = s1.iter().collect();
        let tree = suffix_tree_lcs::SuffixTree::build(&text).unwrap();
        assert_all_substrings(&tree, s1);
        assert!(!tree.contains("bcx"));
        assert!(!tree.contains("cdz"));

        let s2: &[char] = &vec32!['d', 'e', 'f', 'g', 'h', 'i', 'j'];
        let joined = format!("{}#{}$", text, s2.iter().collect::<String>());
        let tree = suffix_tree_lcs::SuffixTree::build(&joined).unwrap();
        assert_all_substrings(&tree, s1);
        assert_all_substrings(&tree, s2);
        assert!(!tree.contains("fd"));
    }

    #[test]
    fn test_longest_common_substring() {
        {
            let s1 = vec32!['1', '2', '3', '4', '5', '6', '7', '8', '9'];
            let s2 = vec32!['7', '8', '9', 'a', 'b', 'c', 'd'];
            let lcs = suffix_tree_lcs::longest_common_substring(&to_string(&s1), &to_string(&s2));
            assert_eq!(lcs.as_deref(), Some("789"));
        }
        {
            let lcs = suffix_tree_lcs::longest_common_substring(
                "VOTEFORTHEGREATALBANIAFORYOU",
                "CHOOSETHEGREATALBANIANFUTURE",
            );
            assert_eq!(lcs.as_deref(), Some("THEGREATALBANIA"));
        }
        {
            let lcs = suffix_tree_lcs::longest_common_substring("HHDBBCIAAE", "AAFJEHDAEG");
            assert_eq!(lcs.map(|s| s.chars().count()), Some(2));
        }
    }

    #[test]
    fn test_multibyte_text() {
        let lcs = suffix_tree_lcs::longest_common_substring("het café is open", "café société");
        assert_eq!(lcs.as_deref(), Some("café "));
        let lcs = suffix_tree_lcs::longest_common_substring("日本語のテキスト", "テキストエディタ");
        assert_eq!(lcs.as_deref(), Some("テキスト"));
        let lcs = suffix_tree_lcs::longest_common_substring("🦀rust🦀", "a🦀rus");
        assert_eq!(lcs.as_deref(), Some("🦀rus"));
    }

    #[test]
    fn test_question_label_alignment() {
        // How label matching consumes the result: fraction of the label covered.
        let question = "What is the capital city of the Netherlands?";
        let labels = ["capital", "Netherlands", "city of light"];
        let fractions: Vec<f64> = labels
            .iter()
            .map(|label| {
                let lcs = suffix_tree_lcs::longest_common_substring(question, label).unwrap_or_default();
                lcs.chars().count() as f64 / label.chars().count() as f64
            })
            .collect();
        assert_eq!(fractions[0], 1.0);
        assert_eq!(fractions[1], 1.0);
        assert!(fractions[2] < 1.0 && fractions[2] > 0.5);
    }

    #[test]
    fn test_long_input_does_not_overflow_the_stack() {
        let first = "ab".repeat(50_000);
        let second = format!("x{}y", "ab".repeat(20_000));
        let lcs = suffix_tree_lcs::longest_common_substring(&first, &second).unwrap();
        assert_eq!(lcs.chars().count(), 40_000);

        let first = "a".repeat(100_000);
        let lcs = suffix_tree_lcs::longest_common_substring(&first, "aaa").unwrap();
        assert_eq!(lcs, "aaa");
    }

    fn gen_random_string(len: usize, alphabet: &[char]) -> Vec32<char> {
        let mut s = Vec32::new();
        for _ in 0..len {
            let ch = alphabet[(rand::random::<u64>() % alphabet.len() as u64) as usize];
            s.push(ch);
        }
        s
    }

    #[test]
    fn test_longest_common_substring_cross_check() {
        let alphabet = ['a', 'b', 'c', 'é', '_'];
        for _ in 0..300 {
            let len1 = (rand::random::<u64>() % 40) as usize;
            let len2 = (rand::random::<u64>() % 40) as usize;
            let s1 = to_string(&gen_random_string(len1, &alphabet));
            let s2 = to_string(&gen_random_string(len2, &alphabet));

            let expected = brute_force_lcs_len(&s1, &s2);
            let result = suffix_tree_lcs::longest_common_substring(&s1, &s2);
            match result {
                Some(lcs) => {
                    assert_eq!(lcs.chars().count(), expected, "{:?} vs {:?}", s1, s2);
                    assert!(s1.contains(&lcs) && s2.contains(&lcs), "{:?} vs {:?}", s1, s2);
                }
                None => assert_eq!(expected, 0, "{:?} vs {:?}", s1, s2),
            }
        }
    }

    #[test]
    #[ignore]
    fn test_longest_common_substring_cross_check_large() {
        let alphabet: Vec<char> = ('a'..='j').collect();
        for _ in 0..2_000 {
            let s1 = to_string(&gen_random_string(100, &alphabet));
            let s2 = to_string(&gen_random_string(100, &alphabet));
            let result1 = suffix_tree_lcs::longest_common_substring(&s1, &s2).unwrap_or_default();
            let result2 = suffix_tree_lcs::longest_common_substring(&s2, &s1).unwrap_or_default();
            assert_eq!(result1.chars().count(), brute_force_lcs_len(&s1, &s2));
            assert_eq!(result1.chars().count(), result2.chars().count());
        }
    }
}
