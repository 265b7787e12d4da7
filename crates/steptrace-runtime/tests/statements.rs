mod common;

use common::{fault, output, run_in};
use steptrace_runtime::Interpreter;

#[test]
fn two_sum_finds_the_pair() {
    let source = r#"
def two_sum(nums, target):
    seen = {}
    for i, num in enumerate(nums):
        complement = target - num
        if complement in seen:
            return [seen[complement], i]
        seen[num] = i
    return []

print(two_sum([2, 7, 11, 15], 9))
"#;
    assert_eq!(output(source), "[0, 1]\n");
}

#[test]
fn defaults_and_keyword_arguments() {
    let source = r#"
def greet(name, greeting="hello"):
    return greeting + ", " + name

print(greet("bob"))
print(greet("amy", greeting="hi"))
print(greet(greeting="hey", name="cy"))
"#;
    assert_eq!(output(source), "hello, bob\nhi, amy\nhey, cy\n");
}

#[test]
fn recursion() {
    let source = "def fib(n):\n    if n < 2:\n        return n\n    return fib(n - 1) + fib(n - 2)\n\nprint(fib(15))\n";
    assert_eq!(output(source), "610\n");
}

#[test]
fn containers_are_shared_by_reference() {
    let source = "a = [1]\nb = a\nb.append(2)\nc = d = []\nc.append(a)\nprint(a, d)\n";
    assert_eq!(output(source), "[1, 2] [[1, 2]]\n");
}

#[test]
fn self_referential_list_prints_ellipsis() {
    assert_eq!(output("a = []\na.append(a)\nprint(a)\n"), "[[...]]\n");
}

#[test]
fn deeply_nested_containers_are_released() {
    let source = "a = []\nd = {}\nfor i in range(200000):\n    a = [a]\n    d = {'next': d}\na = None\nd = None\nprint('done')\n";
    assert_eq!(output(source), "done\n");

    let mut interp = Interpreter::new();
    let (result, _) = run_in(
        &mut interp,
        "t = ()\nfor i in range(200000):\n    t = (t, i)\n",
    );
    assert!(result.is_ok());
    drop(interp);
}

#[test]
fn functions_read_globals_but_assignments_stay_local() {
    let source = "count = 10\ndef f():\n    total = count + 1\n    return total\nprint(f())\nprint(count)\n";
    assert_eq!(output(source), "11\n10\n");
}

#[test]
fn reading_a_local_before_assignment() {
    let source = "x = 1\ndef f():\n    print(x)\n    x = 2\nf()\n";
    assert_eq!(
        fault(source),
        "UnboundLocalError: cannot access local variable 'x' where it is not associated with a value"
    );
}

#[test]
fn break_and_continue() {
    let source = "for i in range(10):\n    if i % 2 == 0:\n        continue\n    if i > 6:\n        break\n    print(i)\n";
    assert_eq!(output(source), "1\n3\n5\n");
}

#[test]
fn while_loops_with_break_inside_function() {
    let source = "def first_square_over(limit):\n    n = 0\n    while True:\n        n += 1\n        if n * n > limit:\n            return n\n\nprint(first_square_over(50))\n";
    assert_eq!(output(source), "8\n");
}

#[test]
fn tuple_unpacking_and_swap() {
    let source = "a, b = 1, 2\na, b = b, a\nprint(a, b)\n(x, y), z = [3, 4], 5\nprint(x + y + z)\n";
    assert_eq!(output(source), "2 1\n12\n");
}

#[test]
fn subscript_assignment_and_augmented_assignment() {
    let source = "counts = {}\nfor ch in 'abca':\n    counts[ch] = counts.get(ch, 0) + 1\ncounts['a'] += 10\nxs = [1, 2]\nxs[-1] *= 5\nprint(counts, xs)\n";
    assert_eq!(output(source), "{'a': 12, 'b': 1, 'c': 1} [1, 10]\n");
}

#[test]
fn iterating_dict_items() {
    let source = "d = {'x': 1, 'y': 2}\nfor k, v in d.items():\n    print(k, v)\nfor k in d:\n    print(k)\n";
    assert_eq!(output(source), "x 1\ny 2\nx\ny\n");
}

#[test]
fn raise_statements() {
    assert_eq!(fault("raise ValueError('bad')\n"), "ValueError: bad");
    assert_eq!(fault("raise KeyError('k')\n"), "KeyError: 'k'");
    assert_eq!(fault("raise RuntimeError\n"), "RuntimeError");
    assert_eq!(
        fault("raise 5\n"),
        "TypeError: exceptions must derive from BaseException"
    );
}

#[test]
fn input_is_served_from_the_queue() {
    let mut interp = Interpreter::new();
    interp.set_input(["ada", "41"]);
    let source = "name = input('Name? ')\nn = int(input())\nprint(name, n + 1)\nprint(repr(input()))\n";
    let (result, out) = run_in(&mut interp, source);
    result.unwrap();
    assert_eq!(out, "ada 42\n''\n");
}

#[test]
fn globals_persist_across_sources() {
    let mut interp = Interpreter::new();
    let (result, _) = run_in(&mut interp, "def helper(x):\n    return x + 1\n");
    result.unwrap();
    let (result, out) = run_in(&mut interp, "print(helper(1))\n");
    result.unwrap();
    assert_eq!(out, "2\n");
}
