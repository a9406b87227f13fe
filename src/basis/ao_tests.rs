use crate::basis::ao::{cart_tuple_to_str, BasisShell, CartOrder, PureOrder};

#[test]
fn test_ao_basis_cartorder() {
    let co_0_lex = CartOrder::lex(0);
    assert_eq!(co_0_lex.cart_tuples, vec![(0, 0, 0)]);

    let co_1_lex = CartOrder::lex(1);
    assert_eq!(co_1_lex.cart_tuples, vec![(1, 0, 0), (0, 1, 0), (0, 0, 1)]);

    let co_2_lex = CartOrder::lex(2);
    assert_eq!(
        co_2_lex.cart_tuples,
        vec![
            (2, 0, 0),
            (1, 1, 0),
            (1, 0, 1),
            (0, 2, 0),
            (0, 1, 1),
            (0, 0, 2),
        ]
    );
    assert!(co_2_lex.verify());
    assert_eq!(co_2_lex.ncomps(), 6);
    assert_eq!(format!("{co_2_lex:?}"), "CartOrder(l = 2; xx, xy, xz, yy, yz, zz)");

    let co_3_lex = CartOrder::lex(3);
    assert_eq!(co_3_lex.ncomps(), 10);
    assert!(co_3_lex.verify());

    assert_eq!(cart_tuple_to_str(&(0, 0, 0)), "1");
    assert_eq!(cart_tuple_to_str(&(2, 1, 1)), "xxyz");
    assert_eq!(cart_tuple_to_str(&(0, 0, 3)), "zzz");
}

#[test]
fn test_ao_basis_pureorder() {
    let po_0 = PureOrder::trexio(0);
    assert_eq!(po_0.iter().copied().collect::<Vec<_>>(), vec![0]);

    let po_2 = PureOrder::trexio(2);
    assert_eq!(
        po_2.iter().copied().collect::<Vec<_>>(),
        vec![0, 1, -1, 2, -2]
    );
    assert!(po_2.verify());
    assert_eq!(po_2.ncomps(), 5);


    let po_4 = PureOrder::trexio(4);
    assert_eq!(po_4.ncomps(), 9);
    assert!(po_4.verify());
    assert_eq!(format!("{po_4:?}"), "PureOrder(l = 4; +0, +1, -1, +2, -2, +3, -3, +4, -4)");
}

#[test]
fn test_ao_basis_shell() {
    let bs_d_cart = BasisShell::trexio(2, true);
    assert_eq!(bs_d_cart.n_funcs(), 6);
    assert_eq!(bs_d_cart.shell_order.to_string(), "Cart (xx, xy, xz, yy, yz, zz)");

    let bs_d_pure = BasisShell::trexio(2, false);
    assert_eq!(bs_d_pure.n_funcs(), 5);
    assert_eq!(bs_d_pure.shell_order.to_string(), "Pure (0, 1, -1, 2, -2)");

    let bs_f_pure = BasisShell::trexio(3, false);
    assert_eq!(bs_f_pure.n_funcs(), 7);
    assert_eq!(BasisShell::trexio(3, true).n_funcs(), 10);
}
