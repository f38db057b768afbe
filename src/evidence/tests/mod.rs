mod packet_tests;
