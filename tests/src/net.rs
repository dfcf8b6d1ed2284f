mod interface_test;
