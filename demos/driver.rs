use balanced_tree::{BalancedTree, TreeError};

fn insert(tree: &mut BalancedTree, key: &str) -> bool {
    tree.insert(key.to_string(), key.as_bytes()[0] as i64)
}

fn dump(step: &str, tree: &BalancedTree) {
    println!("-- {step} (size {}, height {})", tree.size(), tree.height());
    print!("{tree}");
    println!();
}

fn main() -> Result<(), TreeError> {
    let mut tree = BalancedTree::new();
    insert(&mut tree, "F");
    assert!(!insert(&mut tree, "F"));
    insert(&mut tree, "K");
    insert(&mut tree, "X");
    dump("single rotate left", &tree);

    insert(&mut tree, "C");
    insert(&mut tree, "A");
    dump("single rotate right", &tree);

    insert(&mut tree, "D");
    dump("double rotate right", &tree);

    insert(&mut tree, "R");
    dump("double rotate left", &tree);

    for key in ["V", "A", "Z", "M", "D"] {
        insert(&mut tree, key);
    }
    dump("more inserts", &tree);

    for key in ["A", "N"] {
        println!("contains {key}: {}", tree.contains(key));
    }
    for key in ["A", "C", "Q"] {
        match tree.get(key) {
            Some(value) => println!("{key}: {value}"),
            None => println!("{key}: absent"),
        }
    }
    println!("range D..=W: {:?}", tree.find_range("D", "W"));
    println!();

    tree.set_value("A", 108)?;
    dump("set A", &tree);

    for key in ["A", "C", "F", "V", "X", "Z"] {
        tree.remove(key);
        dump(&format!("remove {key}"), &tree);
    }

    let copy = tree.clone();
    dump("copy", &copy);

    for key in copy.keys() {
        println!("{key}");
    }
    Ok(())
}
