mod common;

use common::{eval, fault, output};

#[test]
fn print_separators() {
    assert_eq!(output("print(1, 2, sep='-', end='!')\nprint()\n"), "1-2!\n");
    assert_eq!(
        fault("print(1, sep=2)\n"),
        "TypeError: sep must be None or a string, not int"
    );
}

#[test]
fn conversions() {
    assert_eq!(eval("int('42') + int(3.9) + int(True)"), "46");
    assert_eq!(eval("float('2.5')"), "2.5");
    assert_eq!(eval("str(12) + str([1])"), "'12[1]'");
    assert_eq!(eval("bool(0), bool('x')"), "(False, True)");
    assert_eq!(eval("list('ab'), tuple([1])"), "(['a', 'b'], (1,))");
    assert_eq!(eval("dict([('a', 1)], b=2)"), "{'a': 1, 'b': 2}");
    assert_eq!(eval("repr('x')"), "\"'x'\"");
    assert_eq!(
        fault("float('abc')\n"),
        "ValueError: could not convert string to float: 'abc'"
    );
}

#[test]
fn iteration_helpers() {
    assert_eq!(eval("list(range(5, 0, -2))"), "[5, 3, 1]");
    assert_eq!(eval("list(enumerate('ab', 1))"), "[(1, 'a'), (2, 'b')]");
    assert_eq!(eval("list(zip([1, 2, 3], 'ab'))"), "[(1, 'a'), (2, 'b')]");
    assert_eq!(eval("list(reversed([1, 2, 3]))"), "[3, 2, 1]");
    assert_eq!(eval("list(reversed(range(1, 7, 2)))"), "[5, 3, 1]");
    assert_eq!(eval("len('héllo'), len({}), len(range(3))"), "(5, 0, 3)");
    assert_eq!(
        fault("range(1, 2, 0)\n"),
        "ValueError: range() arg 3 must not be zero"
    );
    assert_eq!(fault("len(5)\n"), "TypeError: object of type 'int' has no len()");
}

#[test]
fn aggregates() {
    assert_eq!(eval("sum([1, 2, 3]), sum([0.5], 1)"), "(6, 1.5)");
    assert_eq!(eval("min(3, 1, 2), max([4, 9, 2])"), "(1, 9)");
    assert_eq!(eval("max(['bb', 'a', 'ccc'], key=len)"), "'ccc'");
    assert_eq!(eval("min([], default=0)"), "0");
    assert_eq!(eval("abs(-4), abs(-2.5)"), "(4, 2.5)");
    assert_eq!(fault("max([])\n"), "ValueError: max() arg is an empty sequence");
}

#[test]
fn sorting() {
    assert_eq!(eval("sorted([3, 1, 2])"), "[1, 2, 3]");
    assert_eq!(eval("sorted('cab', reverse=True)"), "['c', 'b', 'a']");
    assert_eq!(eval("sorted(['bb', 'a', 'cc'], key=len)"), "['a', 'bb', 'cc']");
}

#[test]
fn sorting_with_a_user_key_function() {
    let source = "def second(pair):\n    return pair[1]\n\npairs = [('b', 1), ('a', 1), ('c', 0)]\npairs.sort(key=second)\nprint(pairs)\n";
    assert_eq!(output(source), "[('c', 0), ('b', 1), ('a', 1)]\n");
    assert_eq!(
        fault("sorted([1, 'a'])\n"),
        "TypeError: '<' not supported between instances of 'str' and 'int'"
    );
}

#[test]
fn list_methods() {
    let source = "xs = [3, 1]\nxs.append(2)\nxs.insert(0, 9)\nxs.extend((7, 7))\nprint(xs, xs.index(2), xs.count(7))\nprint(xs.pop(), xs.pop(0), xs)\nxs.reverse()\nxs.sort()\nprint(xs)\n";
    assert_eq!(
        output(source),
        "[9, 3, 1, 2, 7, 7] 3 2\n7 9 [3, 1, 2, 7]\n[1, 2, 3, 7]\n"
    );
    assert_eq!(fault("[].pop()\n"), "IndexError: pop from empty list");
    assert_eq!(fault("[1].index(5)\n"), "ValueError: 5 is not in list");
}

#[test]
fn dict_methods() {
    let source = "d = {'a': 1}\nprint(d.get('a'), d.get('z'), d.get('z', 0))\nd.setdefault('b', []).append(2)\nprint(d.keys(), d.values(), d.items())\nprint(d.pop('a'), d)\n";
    assert_eq!(
        output(source),
        "1 None 0\n['a', 'b'] [1, [2]] [('a', 1), ('b', [2])]\n1 {'b': [2]}\n"
    );
    assert_eq!(fault("{}.pop('k')\n"), "KeyError: 'k'");
}

#[test]
fn str_methods() {
    assert_eq!(eval("'Hi'.upper() + 'Hi'.lower()"), "'HIhi'");
    assert_eq!(eval("'  x  '.strip() + 'xxaxx'.strip('x')"), "'xa'");
    assert_eq!(eval("'a,b,,c'.split(',')"), "['a', 'b', '', 'c']");
    assert_eq!(eval("' a  b '.split()"), "['a', 'b']");
    assert_eq!(eval("'-'.join(['a', 'b'])"), "'a-b'");
    assert_eq!(eval("'hello'.startswith('he'), 'hello'.endswith(('x', 'lo'))"), "(True, True)");
    assert_eq!(eval("'aaa'.replace('a', 'b', 2)"), "'bba'");
    assert_eq!(eval("'héllo'.find('l'), 'abc'.find('z')"), "(2, -1)");
    assert_eq!(
        fault("'-'.join([1])\n"),
        "TypeError: sequence item 0: expected str instance, int found"
    );
}
